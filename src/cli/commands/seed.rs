//! Implementation of the `newsminds seed-samples` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::progress::{create_progress_bar, ProgressBarExt};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Document, Metadata, MetadataValue, SOURCE_ID_FIELD, TITLE_FIELD};
use crate::services::Retriever;

/// Source id attached to every built-in sample article.
pub const SAMPLE_SOURCE_ID: &str = "newsminds-samples";

const SAMPLE_ARTICLES: [(&str, &str); 5] = [
    (
        "Central Bank Holds Rates Steady Amid Cooling Inflation",
        "The central bank left its benchmark interest rate unchanged on Wednesday, \
         citing a steady decline in consumer price growth over the past six months. \
         Policymakers said inflation had eased to 2.8 percent but remained above the \
         two percent target. Several members of the rate committee argued that cuts \
         could begin later in the year if the labour market continues to cool. \
         Mortgage lenders welcomed the decision, saying borrowers needed stability \
         after two years of rapid increases. Analysts expect the bank to publish \
         updated growth forecasts at its next meeting.",
    ),
    (
        "City Council Approves Expansion of Light Rail Network",
        "After a six hour session, the city council voted nine to four to extend the \
         light rail network by twelve kilometres into the northern suburbs. The project \
         adds eight stations and is expected to cut commuting times for forty thousand \
         residents. Opponents raised concerns about construction noise and the cost of \
         land acquisition. Transit officials said federal infrastructure grants would \
         cover roughly half of the budget. Work on the first segment is scheduled to \
         start next spring, with trains running by the end of the decade.",
    ),
    (
        "Researchers Report Gains in Battery Recycling Efficiency",
        "A team of materials scientists has developed a process that recovers more than \
         ninety percent of the lithium and cobalt from spent electric vehicle batteries. \
         The method uses a low temperature solvent instead of the high heat smelting \
         common in existing plants, which cuts energy use and emissions. The researchers \
         said the recovered metals met the purity standards required for new battery \
         cells. A pilot facility built with an industry partner is expected to process \
         several thousand tonnes of battery waste each year.",
    ),
    (
        "Heatwave Prompts Water Restrictions Across Southern Region",
        "Authorities in the southern region introduced water restrictions on Monday as \
         temperatures topped forty degrees for the fifth consecutive day. Residents are \
         banned from watering gardens and washing cars during daylight hours. Reservoir \
         levels have fallen to their lowest point in a decade, and farmers warned that \
         crop yields could drop sharply if the dry spell continues. Emergency services \
         urged people to check on elderly neighbours and to avoid outdoor work in the \
         afternoon.",
    ),
    (
        "National Team Advances to Championship Final",
        "The national football team reached the championship final for the first time \
         in twenty years after a two to one victory in extra time. The winning goal came \
         from a substitute striker who had been on the pitch for only four minutes. The \
         coach praised the defence for holding firm under late pressure and said the \
         squad would rest before travelling to the final. Tickets for the match sold out \
         within an hour of going on sale.",
    ),
];

/// The built-in sample articles as ingestible documents.
pub fn sample_documents() -> Vec<Document> {
    SAMPLE_ARTICLES
        .iter()
        .enumerate()
        .map(|(i, (title, body))| {
            let mut metadata = Metadata::new();
            metadata.insert(TITLE_FIELD.to_string(), MetadataValue::from(*title));
            metadata.insert(SOURCE_ID_FIELD.to_string(), SAMPLE_SOURCE_ID.into());
            metadata.insert("article_id".to_string(), format!("sample-{}", i + 1).into());
            Document::new(*body, metadata)
        })
        .collect()
}

#[derive(Args, Debug)]
pub struct SeedArgs {}

#[derive(Debug, serde::Serialize)]
pub struct SeededArticle {
    pub title: String,
    pub chunks: usize,
}

#[derive(Debug, serde::Serialize)]
pub struct SeedOutput {
    pub collection: String,
    pub articles: Vec<SeededArticle>,
    pub total_chunks: usize,
}

impl CommandOutput for SeedOutput {
    fn to_human(&self) -> String {
        let mut lines: Vec<String> = self
            .articles
            .iter()
            .map(|a| format!("  {} ({} chunks)", a.title, a.chunks))
            .collect();
        lines.insert(
            0,
            format!(
                "Seeded {} sample articles into '{}':",
                self.articles.len(),
                self.collection
            ),
        );
        lines.push(format!("Total: {} chunks", self.total_chunks));
        lines.join("\n")
    }
}

pub async fn execute(_args: SeedArgs, retriever: &Retriever, json_mode: bool) -> Result<()> {
    let documents = sample_documents();
    let pb = create_progress_bar(documents.len() as u64, !json_mode);

    let mut articles = Vec::with_capacity(documents.len());
    for document in &documents {
        let title = document
            .metadata
            .get(TITLE_FIELD)
            .and_then(MetadataValue::as_str)
            .unwrap_or_default()
            .to_string();
        pb.set_message(title.clone());

        let chunks = match retriever
            .ingest_document(&document.text, Some(&document.metadata), None)
            .await
        {
            Ok(chunks) => chunks,
            Err(e) => {
                pb.finish_error(format!("Failed on '{title}'"));
                return Err(e).with_context(|| format!("Failed to ingest sample '{title}'"));
            }
        };

        articles.push(SeededArticle { title, chunks });
        pb.inc(1);
    }
    pb.finish_success("Samples ingested");

    let total_chunks = articles.iter().map(|a| a.chunks).sum();
    output(
        &SeedOutput {
            collection: retriever.index().collection().to_string(),
            articles,
            total_chunks,
        },
        json_mode,
    );

    Ok(())
}
