//! Ask command: retrieval-grounded recommendation

use crate::app::{AskArgs, OutputFormat};
use crate::output::json::format_value;
use crate::Services;
use anyhow::Result;
use futures::StreamExt;
use std::io::Write;
use thali_core::{ChatMessage, RecommendRequest};

pub async fn run(args: AskArgs, services: &Services, format: OutputFormat) -> Result<()> {
    let mut constraints = args.filters.constraints();
    if let Some(ref user_id) = args.user {
        match services.database()?.get_preferences(user_id)? {
            Some(prefs) => constraints = constraints.with_preferences(&prefs),
            None => tracing::info!("No stored preferences for '{}'", user_id),
        }
    }

    let mut request = RecommendRequest::new(vec![ChatMessage::user(args.message.join(" "))])
        .with_constraints(constraints);
    request.limit = args.limit;

    let recommender = services.recommender()?;

    if args.no_stream || format == OutputFormat::Json {
        let recommendation = recommender.answer(&request).await?;
        match format {
            OutputFormat::Json => println!("{}", format_value(&recommendation)),
            OutputFormat::Cli => println!("{}", recommendation.answer),
        }
        return Ok(());
    }

    let (dishes, mut stream) = recommender.answer_stream(&request).await?;
    tracing::debug!("Streaming answer grounded on {} dishes", dishes.len());

    let mut stdout = std::io::stdout();
    while let Some(fragment) = stream.next().await {
        stdout.write_all(fragment?.as_bytes())?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}
