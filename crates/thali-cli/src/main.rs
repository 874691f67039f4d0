//! Thali CLI
//!
//! Vegetarian Indian dish search and recommendations.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use thali_core::error::exit_codes;
use thali_core::{
    ChromaIndex, Config, Database, OpenAIClient, Recommender, Responder, Retriever, ThaliError,
};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

/// Components shared by the command handlers, built on demand
pub struct Services {
    pub config: Config,
}

impl Services {
    fn new(config: Config) -> Self {
        Self { config }
    }

    /// Open the preference store. Only commands that read or write
    /// preferences call this, so index-only commands never touch the disk.
    pub fn database(&self) -> Result<Database> {
        let db = Database::open(&self.config.store.path)?;
        db.initialize()?;
        Ok(db)
    }

    pub fn retriever(&self) -> Result<Retriever> {
        let index = ChromaIndex::new(self.config.index.clone())?;
        Ok(Retriever::new(Arc::new(index)))
    }

    pub fn recommender(&self) -> Result<Recommender> {
        let client = OpenAIClient::new(self.config.llm_service.clone())?;
        Ok(Recommender::new(
            self.retriever()?,
            Responder::new(Arc::new(client)),
        ))
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries results and the MCP channel
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<ThaliError>()
            .map(ThaliError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let services = Services::new(config);

    match cli.command {
        Commands::Search(args) => commands::search::run(args, &services, cli.format).await,
        Commands::Get(args) => commands::get::run(args, &services, cli.format).await,
        Commands::Ask(args) => commands::ask::run(args, &services, cli.format).await,
        Commands::Prefs(args) => commands::prefs::run(args, &services, cli.format),
        Commands::Mcp => {
            thali_mcp::start_server(services.retriever()?, services.database()?).await
        }
    }
}
