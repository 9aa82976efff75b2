use clap::Parser;
use newsminds::cli::{Cli, Commands};
use newsminds::domain::models::MetadataValue;
use std::path::PathBuf;

#[test]
fn test_parse_ingest_with_metadata() {
    let cli = Cli::try_parse_from([
        "newsminds",
        "ingest",
        "article.txt",
        "--title",
        "Rates Hold",
        "--source-id",
        "wire-7",
        "--meta",
        "year=2024",
        "-m",
        "breaking=true",
        "--meta-json",
        r#"{"lang": "en"}"#,
        "--chunk-size",
        "300",
    ])
    .unwrap();

    match cli.command {
        Commands::Ingest(args) => {
            assert_eq!(args.file, PathBuf::from("article.txt"));
            assert_eq!(args.chunk_size, Some(300));

            let metadata = args.metadata().unwrap();
            assert_eq!(metadata["title"], MetadataValue::from("Rates Hold"));
            assert_eq!(metadata["source_id"], MetadataValue::from("wire-7"));
            assert_eq!(metadata["year"], MetadataValue::Integer(2024));
            assert_eq!(metadata["breaking"], MetadataValue::Bool(true));
            assert_eq!(metadata["lang"], MetadataValue::from("en"));
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_ingest_defaults_to_stdin() {
    let cli = Cli::try_parse_from(["newsminds", "ingest"]).unwrap();

    match cli.command {
        Commands::Ingest(args) => {
            assert_eq!(args.file, PathBuf::from("-"));
            assert!(args.title.is_none());
            assert!(args.chunk_size.is_none());
            assert!(args.meta_json.is_none());
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_ingest_rejects_malformed_meta() {
    let result = Cli::try_parse_from(["newsminds", "ingest", "--meta", "no-equals-sign"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_search() {
    let cli = Cli::try_parse_from([
        "newsminds",
        "--json",
        "search",
        "interest rates",
        "--limit",
        "3",
        "--source",
        "wire-7",
    ])
    .unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Search(args) => {
            assert_eq!(args.query, "interest rates");
            assert_eq!(args.limit, Some(3));
            assert_eq!(args.source.as_deref(), Some("wire-7"));
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_search_requires_query() {
    assert!(Cli::try_parse_from(["newsminds", "search"]).is_err());
}

#[test]
fn test_parse_context() {
    let cli = Cli::try_parse_from([
        "newsminds",
        "context",
        "what happened",
        "--max-chars",
        "2000",
        "--prompt",
    ])
    .unwrap();

    match cli.command {
        Commands::Context(args) => {
            assert_eq!(args.query, "what happened");
            assert_eq!(args.max_chars, Some(2000));
            assert!(args.limit.is_none());
            assert!(args.prompt);
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_seed_samples_and_config() {
    let cli = Cli::try_parse_from(["newsminds", "seed-samples"]).unwrap();
    assert!(matches!(cli.command, Commands::SeedSamples(_)));

    let cli = Cli::try_parse_from(["newsminds", "config", "--config", "alt.yaml"]).unwrap();
    assert!(matches!(cli.command, Commands::Config(_)));
    assert_eq!(cli.config, Some(PathBuf::from("alt.yaml")));
}

#[test]
fn test_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["newsminds", "serve"]).is_err());
}
