//! Command-line interface for the newsminds pipeline.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

/// Report `err` on stderr (or as JSON on stdout) and exit with status 1.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        println!(
            "{}",
            serde_json::json!({ "error": err.to_string(), "causes": chain })
        );
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
