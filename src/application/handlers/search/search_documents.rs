//! SearchDocuments - Semantic search over document embeddings.

use std::sync::Arc;
use tracing::warn;

use crate::domain::document::DocumentError;
use crate::ports::{DocumentSearch, EmbeddingProvider, SearchHit, SEARCH_LIMIT};

#[derive(Debug, Clone)]
pub struct SearchDocumentsQuery {
    pub text: String,
}

pub struct SearchDocumentsHandler {
    embeddings: Arc<dyn EmbeddingProvider>,
    search: Arc<dyn DocumentSearch>,
}

impl SearchDocumentsHandler {
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>, search: Arc<dyn DocumentSearch>) -> Self {
        Self { embeddings, search }
    }

    /// Up to `SEARCH_LIMIT` hits, most similar first.
    ///
    /// An unreachable embedding provider yields no hits rather than an error.
    pub async fn handle(&self, query: SearchDocumentsQuery) -> Result<Vec<SearchHit>, DocumentError> {
        let text = query.text.trim();
        if text.is_empty() {
            return Err(DocumentError::validation("q", "Query parameter required"));
        }

        let embedding = match self.embeddings.embed(text).await {
            Ok(embedding) => embedding,
            Err(err) => {
                warn!(model = self.embeddings.model(), error = %err, "search embedding failed");
                return Ok(Vec::new());
            }
        };

        Ok(self.search.search(&embedding, SEARCH_LIMIT).await?)
    }
}
