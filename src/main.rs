//! newsminds CLI entry point.

use anyhow::Result;
use clap::Parser;

use newsminds::cli::commands::{self, build_retriever, load_config};
use newsminds::cli::{handle_error, Cli, Commands};
use newsminds::domain::models::Config;
use newsminds::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Keeps the file writer flushing until exit
    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    if let Err(err) = run(cli.command, &config, cli.json).await {
        tracing::debug!(error = %format!("{err:#}"), "command failed");
        handle_error(err, cli.json);
    }
}

async fn run(command: Commands, config: &Config, json: bool) -> Result<()> {
    if let Commands::Config(args) = command {
        return commands::config::execute(args, config, json);
    }

    let retriever = build_retriever(config)?;
    match command {
        Commands::Ingest(args) => commands::ingest::execute(args, &retriever, json).await,
        Commands::Search(args) => {
            commands::search::execute(args, &retriever, config.retrieval.limit, json).await
        }
        Commands::Context(args) => {
            commands::context::execute(args, &retriever, &config.retrieval, json).await
        }
        Commands::SeedSamples(args) => commands::seed::execute(args, &retriever, json).await,
        Commands::Config(args) => commands::config::execute(args, config, json),
    }
}
