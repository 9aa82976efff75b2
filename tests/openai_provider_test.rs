//! Tests for the OpenAI-compatible embedding provider
//!
//! Uses a mock `/embeddings` endpoint to cover response ordering, request
//! batching, dimension probing and error classification.

use mockito::{Matcher, Server};
use newsminds::adapters::embeddings::OpenAiEmbeddingProvider;
use newsminds::domain::models::EmbeddingConfig;
use newsminds::{Embedder, EmbeddingProvider, RagError};
use serde_json::json;

fn config(base_url: String) -> EmbeddingConfig {
    EmbeddingConfig {
        base_url,
        api_key: Some("sk-test".to_string()),
        dimension: Some(2),
        ..EmbeddingConfig::default()
    }
}

fn embeddings_body(vectors: &[(usize, [f32; 2])]) -> String {
    let data: Vec<_> = vectors
        .iter()
        .map(|(index, embedding)| {
            json!({ "object": "embedding", "index": index, "embedding": embedding })
        })
        .collect();
    json!({ "object": "list", "data": data, "model": "text-embedding-3-small" }).to_string()
}

#[tokio::test]
async fn test_embed_batch_restores_input_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "text-embedding-3-small",
            "input": ["first", "second"]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embeddings_body(&[(1, [0.0, 1.0]), (0, [1.0, 0.0])]))
        .create_async()
        .await;

    let provider = OpenAiEmbeddingProvider::connect(&config(server.url()))
        .await
        .unwrap();
    let vectors = provider
        .embed_batch(&["first".to_string(), "second".to_string()])
        .await
        .unwrap();

    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_embed_batch_splits_requests() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("POST", "/embeddings")
        .match_body(Matcher::PartialJson(json!({ "input": ["a", "b"] })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embeddings_body(&[(0, [1.0, 0.0]), (1, [0.0, 1.0])]))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/embeddings")
        .match_body(Matcher::PartialJson(json!({ "input": ["c"] })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embeddings_body(&[(0, [0.5, 0.5])]))
        .expect(1)
        .create_async()
        .await;

    let provider = OpenAiEmbeddingProvider::connect(&EmbeddingConfig {
        max_batch_size: 2,
        ..config(server.url())
    })
    .await
    .unwrap();
    let texts: Vec<String> = ["a", "b", "c"].iter().map(ToString::to_string).collect();

    let vectors = provider.embed_batch(&texts).await.unwrap();

    assert_eq!(vectors.len(), 3);
    assert_eq!(vectors[2], vec![0.5, 0.5]);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_connect_probes_dimension() {
    let mut server = Server::new_async().await;
    let probe = server
        .mock("POST", "/embeddings")
        .match_body(Matcher::PartialJson(json!({ "input": ["dimension probe"] })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "data": [ { "index": 0, "embedding": [0.1, 0.2, 0.3] } ] }).to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let provider = OpenAiEmbeddingProvider::connect(&EmbeddingConfig {
        dimension: None,
        ..config(server.url())
    })
    .await
    .unwrap();

    assert_eq!(provider.dimension(), 3);
    probe.assert_async().await;
}

#[tokio::test]
async fn test_http_error_is_model_unavailable() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/embeddings")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
        .create_async()
        .await;

    let provider = OpenAiEmbeddingProvider::connect(&config(server.url()))
        .await
        .unwrap();
    let err = provider.embed("hello").await.unwrap_err();

    match err {
        RagError::ModelUnavailable { model, reason } => {
            assert_eq!(model, "text-embedding-3-small");
            assert!(reason.contains("401"));
            assert!(reason.contains("Incorrect API key"));
        }
        other => panic!("expected ModelUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_short_response_is_model_unavailable() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embeddings_body(&[(0, [1.0, 0.0])]))
        .create_async()
        .await;

    let provider = OpenAiEmbeddingProvider::connect(&config(server.url()))
        .await
        .unwrap();
    let err = provider
        .embed_batch(&["one".to_string(), "two".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::ModelUnavailable { .. }));
}

#[tokio::test]
async fn test_failed_probe_is_retried_on_next_call() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("POST", "/embeddings")
        .with_status(503)
        .create_async()
        .await;

    let embedder = Embedder::from_config(&EmbeddingConfig {
        dimension: None,
        ..config(server.url())
    });

    let err = embedder.embed_one("rates").await.unwrap_err();
    assert!(matches!(err, RagError::ModelUnavailable { .. }));
    assert!(!embedder.is_loaded());

    failing.remove_async().await;
    let _working = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embeddings_body(&[(0, [0.6, 0.8])]))
        .create_async()
        .await;

    let vector = embedder.embed_one("rates").await.unwrap();
    assert_eq!(vector, vec![0.6, 0.8]);
    assert!(embedder.is_loaded());
    assert_eq!(embedder.dimension().await.unwrap(), 2);
}
