//! AddReviewer - Invites an external reviewer and issues their token.

use std::sync::Arc;
use tracing::info;

use crate::application::handlers::audit::AuditRecorder;
use crate::domain::approval::{ApprovalError, ExternalReviewer};
use crate::domain::audit::AuditAction;
use crate::domain::foundation::{Actor, DocumentId};
use crate::ports::DocumentUnitOfWork;

#[derive(Debug, Clone)]
pub struct AddReviewerCommand {
    pub document_id: DocumentId,
    pub email: String,
    pub name: String,
    pub actor: Actor,
}

pub struct AddReviewerHandler {
    unit_of_work: Arc<dyn DocumentUnitOfWork>,
}

impl AddReviewerHandler {
    pub fn new(unit_of_work: Arc<dyn DocumentUnitOfWork>) -> Self {
        Self { unit_of_work }
    }

    /// Returns the reviewer including the token the caller must forward.
    pub async fn handle(&self, cmd: AddReviewerCommand) -> Result<ExternalReviewer, ApprovalError> {
        let reviewer = ExternalReviewer::new(cmd.document_id, cmd.email, cmd.name)?;

        let mut tx = self.unit_of_work.begin().await?;
        tx.lock_document(&cmd.document_id)
            .await?
            .ok_or(ApprovalError::DocumentNotFound(cmd.document_id))?;
        tx.insert_reviewer(&reviewer).await?;
        AuditRecorder::record(
            tx.as_mut(),
            cmd.document_id,
            AuditAction::ExternalReviewerAdded,
            &cmd.actor,
            Some(reviewer.added_details()),
        )
        .await?;
        tx.commit().await?;

        info!(document_id = %cmd.document_id, reviewer_id = %reviewer.id, "external reviewer invited");
        Ok(reviewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::document::Document;
    use crate::ports::{ApprovalRepository, AuditLog};

    fn command(document_id: DocumentId, email: &str) -> AddReviewerCommand {
        AddReviewerCommand {
            document_id,
            email: email.to_string(),
            name: "Rev".into(),
            actor: Actor::unknown(),
        }
    }

    #[tokio::test]
    async fn issues_distinct_tokens() {
        let store = Arc::new(InMemoryStore::new());
        let doc = Document::new(DocumentId::new(), "T".into(), "C".into(), None).unwrap();
        store.save(&doc, None).await.unwrap();
        let handler = AddReviewerHandler::new(store.clone());

        let first = handler.handle(command(*doc.id(), "r1@example.com")).await.unwrap();
        let second = handler.handle(command(*doc.id(), "r2@example.com")).await.unwrap();

        assert_ne!(first.token, second.token);
        let found = store.find_reviewer_by_token(&second.token).await.unwrap().unwrap();
        assert_eq!(found.id, second.id);

        let trail = store.list_for_document(doc.id()).await.unwrap();
        assert_eq!(
            trail[0].details.as_deref(),
            Some("Added external reviewer: Rev (r1@example.com)")
        );
    }

    #[tokio::test]
    async fn unknown_document_issues_no_token() {
        let store = Arc::new(InMemoryStore::new());
        let handler = AddReviewerHandler::new(store.clone());
        let id = DocumentId::new();

        let err = handler.handle(command(id, "r1@example.com")).await.unwrap_err();

        assert_eq!(err, ApprovalError::DocumentNotFound(id));
        assert!(store.reviewers(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn audit_failure_revokes_the_invitation() {
        let store = Arc::new(InMemoryStore::new());
        let doc = Document::new(DocumentId::new(), "T".into(), "C".into(), None).unwrap();
        store.save(&doc, None).await.unwrap();
        store.set_fail_audit_writes(true);
        let handler = AddReviewerHandler::new(store.clone());

        let err = handler.handle(command(*doc.id(), "r1@example.com")).await.unwrap_err();

        assert!(err.is_retryable());
        assert!(store.reviewers(doc.id()).await.unwrap().is_empty());
    }
}
