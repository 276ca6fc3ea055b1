//! UpdateDocument - Command handler for editing title, content or author.
//!
//! A content change appends a new version and refreshes the embedding. If
//! the provider fails the stale embedding is cleared rather than kept.
//! Status is never written here; the returned document carries whatever
//! status is stored when the edit lands.

use std::sync::Arc;
use tracing::debug;

use crate::domain::document::{Document, DocumentError, DocumentPatch, DocumentVersion};
use crate::domain::foundation::DocumentId;
use crate::ports::{DocumentRepository, EmbeddingProvider};

use super::embed::embed_or_none;

#[derive(Debug, Clone)]
pub struct UpdateDocumentCommand {
    pub document_id: DocumentId,
    pub patch: DocumentPatch,
}

pub struct UpdateDocumentHandler {
    documents: Arc<dyn DocumentRepository>,
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl UpdateDocumentHandler {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        embeddings: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            documents,
            embeddings,
        }
    }

    pub async fn handle(&self, cmd: UpdateDocumentCommand) -> Result<Document, DocumentError> {
        let mut edited = self
            .documents
            .find_by_id(&cmd.document_id)
            .await?
            .ok_or(DocumentError::NotFound(cmd.document_id))?;

        let outcome = edited.apply_patch(cmd.patch)?;
        let document = self.documents.update_fields(&edited).await?;

        if outcome.content_changed {
            let latest = self.documents.latest_version_number(document.id()).await?;
            let version =
                DocumentVersion::next(*document.id(), document.content().to_string(), latest);
            self.documents.append_version(&version).await?;

            let embedding =
                embed_or_none(self.embeddings.as_ref(), document.id(), document.content()).await;
            self.documents
                .set_embedding(document.id(), embedding.as_ref())
                .await?;

            debug!(
                document_id = %document.id(),
                version = version.version_number,
                "content changed"
            );
        }

        Ok(document)
    }
}
