//! OpenAI-compatible embeddings client.
//!
//! Talks to any server exposing `POST /v1/embeddings` (Ollama, OpenAI,
//! vLLM). Ollama needs no key; when a key is configured it is sent as a
//! bearer token.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::document::Embedding;
use crate::ports::{EmbeddingError, EmbeddingProvider};

/// Connection settings for the embeddings endpoint.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingConfig {
    api_key: Option<Secret<String>>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl HttpEmbeddingConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: base_url.into(),
            model: model.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_key(mut self, api_key: Secret<String>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Embedding provider backed by an HTTP endpoint.
pub struct HttpEmbeddingProvider {
    config: HttpEmbeddingConfig,
    client: Client,
}

impl HttpEmbeddingProvider {
    /// # Errors
    ///
    /// - `Network` if the HTTP client cannot be built
    pub fn new(config: HttpEmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.config.base_url.trim_end_matches('/'))
    }

    async fn send(&self, text: &str) -> Result<Response, EmbeddingError> {
        let mut request = self.client.post(self.embeddings_url()).json(&EmbeddingRequest {
            model: &self.config.model,
            input: text,
        });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                EmbeddingError::Network(format!(
                    "Request timed out after {}s",
                    self.config.timeout.as_secs()
                ))
            } else if e.is_connect() {
                EmbeddingError::Network(format!("Connection failed: {}", e))
            } else {
                EmbeddingError::Network(e.to_string())
            }
        })
    }
}

/// Pull the single embedding out of a decoded response body.
fn first_embedding(body: EmbeddingResponse) -> Result<Embedding, EmbeddingError> {
    let values = body
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| EmbeddingError::InvalidResponse("response contained no embeddings".into()))?;
    Embedding::new(values).map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let response = self.send(text).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Unavailable {
                message: format!("Embedding API error {}: {}", status, body),
            });
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;
        first_embedding(body)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::EMBEDDING_DIMENSIONS;

    fn provider(base_url: &str) -> HttpEmbeddingProvider {
        HttpEmbeddingProvider::new(HttpEmbeddingConfig::new(base_url, "nomic-embed-text")).unwrap()
    }

    #[test]
    fn url_tolerates_trailing_slash() {
        assert_eq!(
            provider("http://localhost:11434/").embeddings_url(),
            "http://localhost:11434/v1/embeddings"
        );
    }

    #[test]
    fn request_body_matches_openai_shape() {
        let body = serde_json::to_value(EmbeddingRequest {
            model: "nomic-embed-text",
            input: "hello",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"model": "nomic-embed-text", "input": "hello"}));
    }

    #[test]
    fn decodes_first_embedding() {
        let json = serde_json::json!({
            "data": [{"embedding": vec![0.25f32; EMBEDDING_DIMENSIONS]}]
        });
        let body: EmbeddingResponse = serde_json::from_value(json).unwrap();
        let embedding = first_embedding(body).unwrap();
        assert_eq!(embedding.as_slice().len(), EMBEDDING_DIMENSIONS);
    }

    #[test]
    fn wrong_width_is_invalid_response() {
        let body = EmbeddingResponse {
            data: vec![EmbeddingData {
                embedding: vec![1.0; 3],
            }],
        };
        assert!(matches!(
            first_embedding(body),
            Err(EmbeddingError::InvalidResponse(_))
        ));
    }

    #[test]
    fn empty_data_is_invalid_response() {
        let body = EmbeddingResponse { data: vec![] };
        assert!(first_embedding(body).is_err());
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let provider = HttpEmbeddingProvider::new(
            HttpEmbeddingConfig::new("http://127.0.0.1:9", "m").with_timeout(Duration::from_millis(200)),
        )
        .unwrap();
        assert!(matches!(
            provider.embed("text").await,
            Err(EmbeddingError::Network(_))
        ));
    }
}
