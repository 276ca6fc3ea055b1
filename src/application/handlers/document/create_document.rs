//! CreateDocument - Command handler for authoring a new draft.

use std::sync::Arc;
use tracing::info;

use crate::application::handlers::audit::AuditRecorder;
use crate::domain::audit::AuditAction;
use crate::domain::document::{Document, DocumentError};
use crate::domain::foundation::{Actor, DocumentId};
use crate::ports::{DocumentUnitOfWork, EmbeddingProvider};

use super::embed::embed_or_none;

/// Command to create a document.
#[derive(Debug, Clone)]
pub struct CreateDocumentCommand {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub actor: Actor,
}

pub struct CreateDocumentHandler {
    unit_of_work: Arc<dyn DocumentUnitOfWork>,
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl CreateDocumentHandler {
    pub fn new(
        unit_of_work: Arc<dyn DocumentUnitOfWork>,
        embeddings: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            unit_of_work,
            embeddings,
        }
    }

    pub async fn handle(&self, cmd: CreateDocumentCommand) -> Result<Document, DocumentError> {
        // 1. Validate and build the draft
        let document = Document::new(DocumentId::new(), cmd.title, cmd.content, cmd.author)?;

        // 2. Embed content; failure leaves the column empty
        let embedding =
            embed_or_none(self.embeddings.as_ref(), document.id(), document.content()).await;

        // 3. Persist with its creation entry
        let mut tx = self.unit_of_work.begin().await?;
        tx.insert_document(&document, embedding.as_ref()).await?;
        AuditRecorder::record(
            tx.as_mut(),
            *document.id(),
            AuditAction::DocumentCreated,
            &cmd.actor,
            Some(format!("Created document: {}", document.title())),
        )
        .await?;
        tx.commit().await?;

        info!(
            document_id = %document.id(),
            embedded = embedding.is_some(),
            "document created"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::embedding::{DisabledEmbeddingProvider, HashingEmbeddingProvider};
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::document::{DocumentStatus, DEFAULT_AUTHOR};
    use crate::ports::{AuditLog, DocumentRepository};

    fn handler(store: &Arc<InMemoryStore>, embeddings: Arc<dyn EmbeddingProvider>) -> CreateDocumentHandler {
        CreateDocumentHandler::new(store.clone(), embeddings)
    }

    fn command(title: &str, content: &str) -> CreateDocumentCommand {
        CreateDocumentCommand {
            title: title.to_string(),
            content: content.to_string(),
            author: None,
            actor: Actor::new("author@example.com", "Alex"),
        }
    }

    #[tokio::test]
    async fn creates_draft_with_embedding_and_audit() {
        let store = Arc::new(InMemoryStore::new());
        let handler = handler(&store, Arc::new(HashingEmbeddingProvider));

        let doc = handler.handle(command("Leave policy", "Ten days")).await.unwrap();

        assert_eq!(doc.status(), DocumentStatus::Draft);
        assert_eq!(doc.author(), DEFAULT_AUTHOR);
        assert!(store.has_embedding(doc.id()).await);

        let trail = store.list_for_document(doc.id()).await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, AuditAction::DocumentCreated);
        assert_eq!(trail[0].actor.email, "author@example.com");
    }

    #[tokio::test]
    async fn creates_without_embedding_when_provider_fails() {
        let store = Arc::new(InMemoryStore::new());
        let handler = handler(&store, Arc::new(DisabledEmbeddingProvider));

        let doc = handler.handle(command("Leave policy", "Ten days")).await.unwrap();

        assert!(!store.has_embedding(doc.id()).await);
    }

    #[tokio::test]
    async fn rejects_blank_title() {
        let store = Arc::new(InMemoryStore::new());
        let handler = handler(&store, Arc::new(HashingEmbeddingProvider));

        let err = handler.handle(command("  ", "Ten days")).await.unwrap_err();

        assert!(matches!(err, DocumentError::ValidationFailed { ref field, .. } if field == "title"));
        assert_eq!(store.audit_count().await, 0);
    }

    #[tokio::test]
    async fn audit_failure_stores_no_document() {
        let store = Arc::new(InMemoryStore::new());
        store.set_fail_audit_writes(true);
        let handler = handler(&store, Arc::new(HashingEmbeddingProvider));

        let err = handler.handle(command("Leave policy", "Ten days")).await.unwrap_err();

        assert!(matches!(err, DocumentError::Infrastructure(_)));
        assert!(store.list(None).await.unwrap().is_empty());
    }
}
