//! Search command

use crate::app::{OutputFormat, SearchArgs};
use crate::output::{format_dishes, FormatOptions};
use crate::Services;
use anyhow::Result;
use thali_core::DishQuery;

pub async fn run(args: SearchArgs, services: &Services, format: OutputFormat) -> Result<()> {
    let query = DishQuery::new(args.query.join(" "))
        .with_constraints(args.filters.constraints())
        .with_limit(args.limit);

    let retriever = services.retriever()?;
    let outcome = retriever.search_outcome(&query).await;
    if outcome.is_degraded() {
        eprintln!("Warning: vector index unavailable, no results");
    }
    let results = outcome.into_inner();

    let options = FormatOptions { full: args.full };
    let output = format_dishes(&results, format, &options);
    if format == OutputFormat::Json || !output.is_empty() {
        print!("{}", output);
        if format == OutputFormat::Json {
            println!();
        }
    } else {
        eprintln!("No matching dishes");
    }
    Ok(())
}
