//! Implementation of the `newsminds ingest` command.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::RagResult;
use crate::domain::models::{
    metadata_from_json_str, Metadata, MetadataValue, SOURCE_ID_FIELD, TITLE_FIELD,
};
use crate::services::Retriever;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// File to ingest; `-` reads standard input
    #[arg(default_value = "-")]
    pub file: PathBuf,

    /// Article title, shown as the source in assembled context
    #[arg(short, long)]
    pub title: Option<String>,

    /// Originating source identifier, used by `search --source`
    #[arg(short, long)]
    pub source_id: Option<String>,

    /// Article URL
    #[arg(long)]
    pub url: Option<String>,

    /// Article author
    #[arg(long)]
    pub author: Option<String>,

    /// Extra metadata as key=value (repeatable); numbers and booleans are typed
    #[arg(short, long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub meta: Vec<(String, String)>,

    /// Extra metadata as a flat JSON object; `--meta` entries override it
    #[arg(long, value_name = "JSON")]
    pub meta_json: Option<String>,

    /// Characters per chunk (defaults to the configured size)
    #[arg(long)]
    pub chunk_size: Option<usize>,
}

impl IngestArgs {
    /// Document metadata from the flags.
    ///
    /// Named flags win over `--meta`, which wins over `--meta-json`.
    pub fn metadata(&self) -> RagResult<Metadata> {
        let mut metadata = match &self.meta_json {
            Some(raw) => metadata_from_json_str(raw)?,
            None => Metadata::new(),
        };

        metadata.extend(
            self.meta
                .iter()
                .map(|(key, value)| (key.clone(), MetadataValue::parse_loose(value))),
        );

        let named = [
            (TITLE_FIELD, &self.title),
            (SOURCE_ID_FIELD, &self.source_id),
            ("url", &self.url),
            ("author", &self.author),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                metadata.insert(key.to_string(), MetadataValue::String(value.clone()));
            }
        }

        Ok(metadata)
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[derive(Debug, serde::Serialize)]
pub struct IngestOutput {
    pub chunks: usize,
    pub collection: String,
    pub title: Option<String>,
}

impl CommandOutput for IngestOutput {
    fn to_human(&self) -> String {
        let title = self
            .title
            .as_deref()
            .map(|t| format!(" '{t}'"))
            .unwrap_or_default();

        if self.chunks == 0 {
            format!("Nothing to ingest{title}: document is empty")
        } else {
            format!(
                "Ingested{title} as {} chunk{} into '{}'",
                self.chunks,
                if self.chunks == 1 { "" } else { "s" },
                self.collection
            )
        }
    }
}

async fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read document from stdin")?;
        return Ok(text);
    }

    if !file.exists() {
        bail!("File not found: {}", file.display());
    }

    tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))
}

pub async fn execute(args: IngestArgs, retriever: &Retriever, json_mode: bool) -> Result<()> {
    let text = read_input(&args.file).await?;
    let metadata = args.metadata().context("Invalid document metadata")?;

    let chunks = retriever
        .ingest_document(&text, Some(&metadata), args.chunk_size)
        .await
        .context("Failed to ingest document")?;

    output(
        &IngestOutput {
            chunks,
            collection: retriever.index().collection().to_string(),
            title: args.title,
        },
        json_mode,
    );

    Ok(())
}
