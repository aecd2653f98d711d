use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use docqa_core::{Embedding, EmbeddingError};
use docqa_embeddings::OllamaEmbedding;

#[tokio::test]
async fn ollama_embedding_maps_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embedding": [0.4, 0.5]
        })))
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "all-minilm", 2);
    let out = embedder.embed("hello").await.unwrap();
    assert_eq!(out, vec![0.4, 0.5]);
    assert_eq!(embedder.name(), "all-minilm");
}

#[tokio::test]
async fn ollama_embedding_rejects_wrong_dimension() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embedding": [0.1, 0.2, 0.3]
        })))
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "all-minilm", 2);
    let error = embedder.embed("hello").await.unwrap_err();

    assert!(matches!(error, EmbeddingError::InvalidResponse(ref message) if message.contains("got 3")));
}

#[tokio::test]
async fn ollama_embedding_surfaces_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "all-minilm", 2);
    let error = embedder.embed("hello").await.unwrap_err();

    assert!(matches!(error, EmbeddingError::Provider(_)));
}

#[tokio::test]
async fn ollama_embedding_rejects_blank_text_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "all-minilm", 2);
    assert!(matches!(
        embedder.embed("  ").await.unwrap_err(),
        EmbeddingError::EmptyInput
    ));
}

/// Answers with a one-hot vector whose hot index is the prompt length, so the
/// test can tell which response belongs to which input.
struct LengthEcho;

impl Respond for LengthEcho {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let len = body["prompt"].as_str().unwrap().len();
        let mut embedding = vec![0.0f32; 8];
        embedding[len % 8] = 1.0;
        // Longer prompts answer faster, so completion order differs from input order.
        ResponseTemplate::new(200)
            .set_delay(std::time::Duration::from_millis((8 - len as u64 % 8) * 10))
            .set_body_json(json!({ "embedding": embedding }))
    }
}

#[tokio::test]
async fn ollama_embedding_batch_preserves_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(LengthEcho)
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "all-minilm", 8).with_concurrency(4);
    let texts: Vec<String> = ["a", "bbb", "cc", "dddddd"].iter().map(|s| s.to_string()).collect();
    let vectors = embedder.embed_batch(&texts).await.unwrap();

    let hot: Vec<usize> = vectors
        .iter()
        .map(|v| v.iter().position(|x| *x == 1.0).unwrap())
        .collect();
    assert_eq!(hot, vec![1, 3, 2, 6]);
}

#[tokio::test]
async fn probe_succeeds_when_model_is_installed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/show"))
        .and(body_partial_json(json!({ "name": "all-minilm" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "details": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "all-minilm", 384);
    embedder.probe().await.unwrap();
}

#[tokio::test]
async fn probe_fails_for_missing_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/show"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "all-minilm", 384);
    let error: EmbeddingError = embedder.probe().await.unwrap_err().into();

    assert!(matches!(error, EmbeddingError::Unavailable { ref backend, .. } if backend == "all-minilm"));
}
