//! DecideDocument - Direct approve or reject of a pending document,
//! bypassing participant aggregation.
//!
//! Runs under the document lock, so a resolution settling the same document
//! either finishes first (and the direct decision is refused) or waits and
//! finds the document already terminal.

use std::sync::Arc;
use tracing::info;

use crate::application::handlers::audit::AuditRecorder;
use crate::domain::audit::AuditAction;
use crate::domain::document::{Document, DocumentError};
use crate::domain::foundation::{Actor, Decision, DocumentId};
use crate::ports::DocumentUnitOfWork;

#[derive(Debug, Clone)]
pub struct DecideDocumentCommand {
    pub document_id: DocumentId,
    pub decision: Decision,
    pub comment: Option<String>,
    pub actor: Actor,
}

pub struct DecideDocumentHandler {
    unit_of_work: Arc<dyn DocumentUnitOfWork>,
}

impl DecideDocumentHandler {
    pub fn new(unit_of_work: Arc<dyn DocumentUnitOfWork>) -> Self {
        Self { unit_of_work }
    }

    pub async fn handle(&self, cmd: DecideDocumentCommand) -> Result<Document, DocumentError> {
        let mut tx = self.unit_of_work.begin().await?;
        let mut document = tx
            .lock_document(&cmd.document_id)
            .await?
            .ok_or(DocumentError::NotFound(cmd.document_id))?;

        document.decide(cmd.decision)?;
        tx.update_document_status(&document).await?;
        AuditRecorder::record(
            tx.as_mut(),
            *document.id(),
            AuditAction::document_decision(cmd.decision),
            &cmd.actor,
            cmd.comment,
        )
        .await?;
        tx.commit().await?;

        info!(
            document_id = %document.id(),
            decision = %cmd.decision,
            actor = %cmd.actor.email,
            "document decided directly"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::approval::{
        ParticipantRef, ResolutionOutcome, ResolveParticipantCommand, ResolveParticipantHandler,
    };
    use crate::domain::approval::{ApprovalError, Approver};
    use crate::domain::document::DocumentStatus;
    use crate::domain::foundation::DomainError;
    use crate::ports::{AuditLog, DocumentRepository, DocumentTransaction};
    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use tokio::task::JoinHandle;

    async fn pending_document(store: &InMemoryStore) -> Document {
        let mut doc = Document::new(DocumentId::new(), "T".into(), "C".into(), None).unwrap();
        doc.submit().unwrap();
        store.save(&doc, None).await.unwrap();
        doc
    }

    async fn sole_approver(store: &InMemoryStore, doc: &Document) -> Approver {
        let approver = Approver::new(*doc.id(), "ana@example.com".into(), "Ana".into(), 0).unwrap();
        store.add_approver(&approver).await.unwrap();
        approver
    }

    fn command(document_id: DocumentId, decision: Decision) -> DecideDocumentCommand {
        DecideDocumentCommand {
            document_id,
            decision,
            comment: Some("Looks fine".into()),
            actor: Actor::new("lead@example.com", "Lee"),
        }
    }

    fn approve(approver: &Approver) -> ResolveParticipantCommand {
        ResolveParticipantCommand {
            participant: ParticipantRef::Approver {
                document_id: approver.document_id,
                approver_id: approver.id,
            },
            decision: Decision::Approved,
            comment: None,
            actor: Actor::new(approver.email.clone(), approver.name.clone()),
        }
    }

    async fn trail(store: &InMemoryStore, doc: &Document) -> Vec<AuditAction> {
        store
            .list_for_document(doc.id())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.action)
            .collect()
    }

    /// Starts a resolution on another task as soon as a transaction opens,
    /// so it runs while that transaction is still in flight.
    struct ResolveDuringTransaction {
        store: Arc<InMemoryStore>,
        pending: Mutex<Option<ResolveParticipantCommand>>,
        spawned: Mutex<Option<JoinHandle<Result<ResolutionOutcome, ApprovalError>>>>,
    }

    impl ResolveDuringTransaction {
        fn new(store: Arc<InMemoryStore>, cmd: ResolveParticipantCommand) -> Self {
            Self {
                store,
                pending: Mutex::new(Some(cmd)),
                spawned: Mutex::new(None),
            }
        }

        async fn resolution(&self) -> Result<ResolutionOutcome, ApprovalError> {
            let handle = self.spawned.lock().await.take().unwrap();
            handle.await.unwrap()
        }
    }

    #[async_trait]
    impl DocumentUnitOfWork for ResolveDuringTransaction {
        async fn begin(&self) -> Result<Box<dyn DocumentTransaction>, DomainError> {
            let tx = self.store.begin().await?;
            if let Some(cmd) = self.pending.lock().await.take() {
                let resolver = ResolveParticipantHandler::new(self.store.clone());
                let handle = tokio::spawn(async move { resolver.handle(cmd).await });
                *self.spawned.lock().await = Some(handle);
            }
            Ok(tx)
        }
    }

    #[tokio::test]
    async fn approve_pending_document() {
        let store = Arc::new(InMemoryStore::new());
        let doc = pending_document(&store).await;
        let handler = DecideDocumentHandler::new(store.clone());

        let decided = handler.handle(command(*doc.id(), Decision::Approved)).await.unwrap();

        assert_eq!(decided.status(), DocumentStatus::Approved);
        let trail = store.list_for_document(doc.id()).await.unwrap();
        assert_eq!(trail[0].action, AuditAction::DocumentApproved);
        assert_eq!(trail[0].details.as_deref(), Some("Looks fine"));
        assert_eq!(trail[0].actor.name, "Lee");
    }

    #[tokio::test]
    async fn cannot_reject_a_draft() {
        let store = Arc::new(InMemoryStore::new());
        let doc = Document::new(DocumentId::new(), "T".into(), "C".into(), None).unwrap();
        store.save(&doc, None).await.unwrap();
        let handler = DecideDocumentHandler::new(store.clone());

        let err = handler.handle(command(*doc.id(), Decision::Rejected)).await.unwrap_err();

        assert_eq!(err.message(), "Can only reject pending documents");
        assert_eq!(store.audit_count().await, 0);
    }

    #[tokio::test]
    async fn audit_failure_keeps_the_document_pending() {
        let store = Arc::new(InMemoryStore::new());
        let doc = pending_document(&store).await;
        store.set_fail_audit_writes(true);
        let handler = DecideDocumentHandler::new(store.clone());

        let err = handler.handle(command(*doc.id(), Decision::Approved)).await.unwrap_err();

        assert!(matches!(err, DocumentError::Infrastructure(_)));
        store.set_fail_audit_writes(false);
        let stored = store.find_by_id(doc.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DocumentStatus::Pending);
        assert_eq!(store.audit_count().await, 0);

        let retried = handler.handle(command(*doc.id(), Decision::Approved)).await.unwrap();
        assert_eq!(retried.status(), DocumentStatus::Approved);
    }

    #[tokio::test]
    async fn settled_document_refuses_a_later_direct_decision() {
        let store = Arc::new(InMemoryStore::new());
        let doc = pending_document(&store).await;
        let approver = sole_approver(&store, &doc).await;
        let resolved = ResolveParticipantHandler::new(store.clone())
            .handle(approve(&approver))
            .await
            .unwrap();
        assert!(resolved.settled);

        let err = DecideDocumentHandler::new(store.clone())
            .handle(command(*doc.id(), Decision::Rejected))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Can only reject pending documents");
        let stored = store.find_by_id(doc.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DocumentStatus::Approved);
        assert_eq!(
            trail(&store, &doc).await,
            vec![AuditAction::ApproverApproved, AuditAction::DocumentApproved]
        );
    }

    #[tokio::test]
    async fn resolution_racing_a_direct_decision_waits_and_leaves_it_standing() {
        let store = Arc::new(InMemoryStore::new());
        let doc = pending_document(&store).await;
        let approver = sole_approver(&store, &doc).await;
        let uow = Arc::new(ResolveDuringTransaction::new(store.clone(), approve(&approver)));
        let handler = DecideDocumentHandler::new(uow.clone());

        let decided = handler.handle(command(*doc.id(), Decision::Rejected)).await.unwrap();
        let resolution = uow.resolution().await.unwrap();

        assert_eq!(decided.status(), DocumentStatus::Rejected);
        assert!(!resolution.settled);
        let stored = store.find_by_id(doc.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DocumentStatus::Rejected);
        assert_eq!(
            trail(&store, &doc).await,
            vec![AuditAction::DocumentRejected, AuditAction::ApproverApproved]
        );
    }
}
