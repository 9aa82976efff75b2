//! Table output formatting for CLI commands
//!
//! Renders retrieval results with comfy-table.

use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{SearchHit, CHUNK_INDEX_KEY, SOURCE_ID_FIELD};
use crate::services::UNKNOWN_TITLE;

use super::truncate;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format ranked search hits as a table
    pub fn format_hits(&self, hits: &[SearchHit]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Score").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Chunk").add_attribute(Attribute::Bold),
            Cell::new("Text").add_attribute(Attribute::Bold),
        ]);

        for (rank, hit) in hits.iter().enumerate() {
            let score = Cell::new(format!("{:.3}", hit.score)).set_alignment(CellAlignment::Right);
            let score = if self.use_colors {
                score.fg(score_color(hit.score))
            } else {
                score
            };

            let source = hit
                .metadata
                .get(SOURCE_ID_FIELD)
                .map_or_else(|| "-".to_string(), ToString::to_string);
            let chunk = hit
                .metadata
                .get(CHUNK_INDEX_KEY)
                .map_or_else(|| "-".to_string(), ToString::to_string);

            table.add_row(vec![
                Cell::new(rank + 1),
                score,
                Cell::new(truncate(hit.title().unwrap_or(UNKNOWN_TITLE), 40)),
                Cell::new(source),
                Cell::new(chunk),
                Cell::new(truncate(&hit.text.replace('\n', " "), 80)),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

fn score_color(score: f32) -> Color {
    if score >= 0.5 {
        Color::Green
    } else if score >= 0.25 {
        Color::Yellow
    } else {
        Color::DarkGrey
    }
}
