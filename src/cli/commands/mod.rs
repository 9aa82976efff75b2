//! CLI command implementations.

pub mod config;
pub mod context;
pub mod ingest;
pub mod search;
pub mod seed;

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::Retriever;

/// Load configuration from `path`, or from the default project files.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Build the retrieval pipeline described by `config`.
pub fn build_retriever(config: &Config) -> Result<Retriever> {
    Retriever::from_config(config).context("Failed to set up the retrieval pipeline")
}
