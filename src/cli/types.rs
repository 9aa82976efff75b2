//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::{
    config::ConfigArgs, context::ContextArgs, ingest::IngestArgs, search::SearchArgs,
    seed::SeedArgs,
};

#[derive(Parser, Debug)]
#[command(name = "newsminds")]
#[command(about = "Newsminds - chunk, embed and retrieve news articles", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to newsminds.yaml and .newsminds/local.yaml)
    #[arg(short, long, global = true, env = "NEWSMINDS_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chunk, embed and store one document
    Ingest(IngestArgs),

    /// Retrieve the chunks most similar to a query
    Search(SearchArgs),

    /// Assemble a budgeted context block for a query
    Context(ContextArgs),

    /// Ingest the built-in sample articles
    SeedSamples(SeedArgs),

    /// Show the effective configuration (API keys redacted)
    Config(ConfigArgs),
}
