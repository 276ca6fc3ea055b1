//! SubmitDocument - Moves a draft (or a rejected document) into review.

use std::sync::Arc;

use crate::application::handlers::audit::AuditRecorder;
use crate::domain::audit::AuditAction;
use crate::domain::document::{Document, DocumentError};
use crate::domain::foundation::{Actor, DocumentId};
use crate::ports::DocumentUnitOfWork;

#[derive(Debug, Clone)]
pub struct SubmitDocumentCommand {
    pub document_id: DocumentId,
    pub actor: Actor,
}

pub struct SubmitDocumentHandler {
    unit_of_work: Arc<dyn DocumentUnitOfWork>,
}

impl SubmitDocumentHandler {
    pub fn new(unit_of_work: Arc<dyn DocumentUnitOfWork>) -> Self {
        Self { unit_of_work }
    }

    pub async fn handle(&self, cmd: SubmitDocumentCommand) -> Result<Document, DocumentError> {
        let mut tx = self.unit_of_work.begin().await?;
        let mut document = tx
            .lock_document(&cmd.document_id)
            .await?
            .ok_or(DocumentError::NotFound(cmd.document_id))?;

        document.submit()?;
        tx.update_document_status(&document).await?;
        AuditRecorder::record(
            tx.as_mut(),
            *document.id(),
            AuditAction::SubmittedForReview,
            &cmd.actor,
            None,
        )
        .await?;
        tx.commit().await?;

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::document::DocumentStatus;
    use crate::ports::{AuditLog, DocumentRepository};

    #[tokio::test]
    async fn submit_moves_draft_to_pending_and_audits() {
        let store = Arc::new(InMemoryStore::new());
        let doc = Document::new(DocumentId::new(), "T".into(), "C".into(), None).unwrap();
        store.save(&doc, None).await.unwrap();
        let handler = SubmitDocumentHandler::new(store.clone());

        let submitted = handler
            .handle(SubmitDocumentCommand {
                document_id: *doc.id(),
                actor: Actor::new("a@example.com", "A"),
            })
            .await
            .unwrap();

        assert_eq!(submitted.status(), DocumentStatus::Pending);
        let trail = store.list_for_document(doc.id()).await.unwrap();
        assert_eq!(trail[0].action, AuditAction::SubmittedForReview);
    }

    #[tokio::test]
    async fn submitting_pending_document_is_invalid_state() {
        let store = Arc::new(InMemoryStore::new());
        let mut doc = Document::new(DocumentId::new(), "T".into(), "C".into(), None).unwrap();
        doc.submit().unwrap();
        store.save(&doc, None).await.unwrap();
        let handler = SubmitDocumentHandler::new(store.clone());

        let err = handler
            .handle(SubmitDocumentCommand {
                document_id: *doc.id(),
                actor: Actor::unknown(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DocumentError::InvalidState(_)));
        assert_eq!(store.audit_count().await, 0);
    }

    #[tokio::test]
    async fn audit_failure_leaves_the_draft_unsubmitted() {
        let store = Arc::new(InMemoryStore::new());
        let doc = Document::new(DocumentId::new(), "T".into(), "C".into(), None).unwrap();
        store.save(&doc, None).await.unwrap();
        store.set_fail_audit_writes(true);
        let handler = SubmitDocumentHandler::new(store.clone());
        let command = SubmitDocumentCommand {
            document_id: *doc.id(),
            actor: Actor::unknown(),
        };

        let err = handler.handle(command.clone()).await.unwrap_err();
        assert!(matches!(err, DocumentError::Infrastructure(_)));
        let stored = store.find_by_id(doc.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DocumentStatus::Draft);

        store.set_fail_audit_writes(false);
        let submitted = handler.handle(command).await.unwrap();
        assert_eq!(submitted.status(), DocumentStatus::Pending);
        assert_eq!(store.audit_count().await, 1);
    }
}
