//! Similarity search over stored document embeddings.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::document::{Document, Embedding};
use crate::domain::foundation::DomainError;

/// Maximum number of hits a search returns.
pub const SEARCH_LIMIT: u32 = 20;

/// A document with its similarity to the query, `1 - cosine distance`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub document: Document,
    pub similarity: f64,
}

#[async_trait]
pub trait DocumentSearch: Send + Sync {
    /// Documents with an embedding, most similar first.
    async fn search(&self, query: &Embedding, limit: u32) -> Result<Vec<SearchHit>, DomainError>;
}
