//! Embedding provider adapters.
//!
//! - `HttpEmbeddingProvider` - OpenAI-compatible `/v1/embeddings` client
//! - `DisabledEmbeddingProvider` - Embeddings switched off
//! - `HashingEmbeddingProvider` - Deterministic offline embedder for tests

mod fixed_providers;
mod http_provider;

pub use fixed_providers::{DisabledEmbeddingProvider, HashingEmbeddingProvider};
pub use http_provider::{HttpEmbeddingConfig, HttpEmbeddingProvider};
