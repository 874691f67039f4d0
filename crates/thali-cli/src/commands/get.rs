//! Get dish command

use crate::app::{GetArgs, OutputFormat};
use crate::output::format_dish;
use crate::Services;
use anyhow::Result;
use thali_core::ThaliError;

pub async fn run(args: GetArgs, services: &Services, format: OutputFormat) -> Result<()> {
    let retriever = services.retriever()?;

    let outcome = retriever.get_by_id_outcome(&args.id).await;
    if outcome.is_degraded() {
        eprintln!("Warning: vector index unavailable");
    }

    match outcome.into_inner() {
        Some(dish) => {
            println!("{}", format_dish(&dish, format).trim_end());
            Ok(())
        }
        None => Err(ThaliError::DishNotFound(args.id).into()),
    }
}
