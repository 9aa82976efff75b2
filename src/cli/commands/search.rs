//! Implementation of the `newsminds search` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::SearchHit;
use crate::services::Retriever;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query text
    pub query: String,

    /// Maximum number of results (defaults to the configured limit)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Only return chunks from this source id
    #[arg(short, long)]
    pub source: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub hits: Vec<SearchHit>,
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        if self.hits.is_empty() {
            return format!("No results for '{}'.", self.query);
        }

        format!(
            "{}\n\nShowing {} result{}",
            TableFormatter::new().format_hits(&self.hits),
            self.hits.len(),
            if self.hits.len() == 1 { "" } else { "s" }
        )
    }
}

pub async fn execute(
    args: SearchArgs,
    retriever: &Retriever,
    default_limit: usize,
    json_mode: bool,
) -> Result<()> {
    let hits = retriever
        .retrieve(
            &args.query,
            args.limit.unwrap_or(default_limit),
            args.source.as_deref(),
        )
        .await
        .context("Search failed")?;

    output(
        &SearchOutput {
            query: args.query,
            hits,
        },
        json_mode,
    );

    Ok(())
}
