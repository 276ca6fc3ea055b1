//! Embedding provider port.
//!
//! Turns document text into a fixed-width vector. Callers treat every
//! failure as "no embedding": documents are saved without one and search
//! returns nothing.

use async_trait::async_trait;

use crate::domain::document::Embedding;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Model name, for logs.
    fn model(&self) -> &str;
}

/// Embedding failures.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Embeddings are switched off in configuration.
    #[error("embedding provider disabled")]
    Disabled,

    /// Provider answered with a non-success status.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("network error: {0}")]
    Network(String),

    /// Body could not be decoded or had the wrong shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
