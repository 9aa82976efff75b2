//! Implementation of the `newsminds context` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::RetrievalConfig;
use crate::services::{build_augmented_prompt, Retriever};

#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Query text
    pub query: String,

    /// Maximum number of chunks to consider (defaults to the configured limit)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Character budget (defaults to the configured budget)
    #[arg(short, long)]
    pub max_chars: Option<usize>,

    /// Print a complete prompt with the query as the question
    #[arg(short, long)]
    pub prompt: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct ContextOutput {
    pub query: String,
    pub characters: usize,
    pub context: String,
}

impl CommandOutput for ContextOutput {
    fn to_human(&self) -> String {
        if self.context.is_empty() {
            format!("No context found for '{}'.", self.query)
        } else {
            self.context.clone()
        }
    }
}

pub async fn execute(
    args: ContextArgs,
    retriever: &Retriever,
    defaults: &RetrievalConfig,
    json_mode: bool,
) -> Result<()> {
    let context = retriever
        .get_context(
            &args.query,
            args.limit.unwrap_or(defaults.limit),
            args.max_chars.unwrap_or(defaults.max_context_chars),
        )
        .await
        .context("Failed to assemble context")?;

    let context = if args.prompt {
        build_augmented_prompt(&args.query, &context)
    } else {
        context
    };

    output(
        &ContextOutput {
            characters: context.chars().count(),
            query: args.query,
            context,
        },
        json_mode,
    );

    Ok(())
}
