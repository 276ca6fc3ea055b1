//! Best-effort embedding of document content.

use tracing::warn;

use crate::domain::document::Embedding;
use crate::domain::foundation::DocumentId;
use crate::ports::{EmbeddingError, EmbeddingProvider};

/// Embed `content`, logging and swallowing any provider failure.
pub(super) async fn embed_or_none(
    provider: &dyn EmbeddingProvider,
    document_id: &DocumentId,
    content: &str,
) -> Option<Embedding> {
    match provider.embed(content).await {
        Ok(embedding) => Some(embedding),
        Err(EmbeddingError::Disabled) => None,
        Err(err) => {
            warn!(
                document_id = %document_id,
                model = provider.model(),
                error = %err,
                "embedding failed, storing document without embedding"
            );
            None
        }
    }
}
