//! Implementation of the `newsminds config` command.

use anyhow::Result;
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {}

#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
pub struct ConfigOutput {
    pub config: Config,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config)
            .unwrap_or_else(|e| format!("Failed to render configuration: {e}"))
    }
}

pub fn execute(_args: ConfigArgs, config: &Config, json_mode: bool) -> Result<()> {
    output(
        &ConfigOutput {
            config: config.redacted(),
        },
        json_mode,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_redacted_yaml() {
        let mut config = Config::default();
        config.embedding.api_key = Some("sk-live".to_string());

        let out = ConfigOutput {
            config: config.redacted(),
        };
        let yaml = out.to_human();

        assert!(yaml.contains("collection: articles"));
        assert!(!yaml.contains("sk-live"));
        assert_eq!(out.to_json()["index"]["url"], "http://localhost:6333");
    }
}
