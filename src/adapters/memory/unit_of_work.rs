//! In-memory document transaction.
//!
//! `begin` takes the store's mutex and works on a staged copy of the
//! tables; `commit` writes the copy back. Dropping the transaction discards
//! the copy and releases the mutex.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

use crate::domain::approval::{Approver, ExternalReviewer, ParticipantSet, ReviewToken};
use crate::domain::audit::AuditEntry;
use crate::domain::document::{Deadline, Document, Embedding};
use crate::domain::foundation::{ApproverId, DocumentId, DomainError, ReviewerId};
use crate::ports::{DocumentTransaction, DocumentUnitOfWork};

use super::store::{already_resolved, chain_for, reviewers_for, FailureFlags, Tables};
use super::InMemoryStore;

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    failures: Arc<FailureFlags>,
}

#[async_trait]
impl DocumentUnitOfWork for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn DocumentTransaction>, DomainError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryTransaction {
            guard,
            staged,
            failures: Arc::clone(&self.failures),
        }))
    }
}

#[async_trait]
impl DocumentTransaction for InMemoryTransaction {
    async fn lock_document(&mut self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        Ok(self.staged.documents.get(id).map(|stored| stored.document.clone()))
    }

    async fn insert_document(
        &mut self,
        document: &Document,
        embedding: Option<&Embedding>,
    ) -> Result<(), DomainError> {
        self.failures.check_write("Failed to insert document")?;
        self.staged.insert_document(document, embedding);
        Ok(())
    }

    async fn update_document_status(&mut self, document: &Document) -> Result<(), DomainError> {
        self.failures.check_write("Failed to update document status")?;
        let stored = self
            .staged
            .documents
            .get_mut(document.id())
            .ok_or_else(|| DomainError::document_not_found(document.id()))?;
        let current = &stored.document;
        stored.document = Document::reconstitute(
            *current.id(),
            current.title().to_string(),
            current.content().to_string(),
            document.status(),
            current.author().to_string(),
            *current.created_at(),
            *document.updated_at(),
        );
        Ok(())
    }

    async fn find_approver(
        &mut self,
        document_id: &DocumentId,
        approver_id: &ApproverId,
    ) -> Result<Option<Approver>, DomainError> {
        Ok(self
            .staged
            .approvers
            .iter()
            .find(|a| &a.id == approver_id && &a.document_id == document_id)
            .cloned())
    }

    async fn find_reviewer_by_token(
        &mut self,
        token: &ReviewToken,
    ) -> Result<Option<ExternalReviewer>, DomainError> {
        Ok(self.staged.reviewers.iter().find(|r| &r.token == token).cloned())
    }

    async fn insert_approver(&mut self, approver: &Approver) -> Result<(), DomainError> {
        self.failures.check_write("Failed to insert approver")?;
        self.staged.insert_approver(approver)
    }

    async fn delete_approver(
        &mut self,
        document_id: &DocumentId,
        approver_id: &ApproverId,
    ) -> Result<Option<Approver>, DomainError> {
        self.failures.check_write("Failed to delete approver")?;
        let position = self
            .staged
            .approvers
            .iter()
            .position(|a| &a.id == approver_id && &a.document_id == document_id);
        Ok(position.map(|index| self.staged.approvers.remove(index)))
    }

    async fn insert_reviewer(&mut self, reviewer: &ExternalReviewer) -> Result<(), DomainError> {
        self.failures.check_write("Failed to insert external reviewer")?;
        self.staged.insert_reviewer(reviewer)
    }

    async fn delete_reviewer(
        &mut self,
        document_id: &DocumentId,
        reviewer_id: &ReviewerId,
    ) -> Result<Option<ExternalReviewer>, DomainError> {
        self.failures.check_write("Failed to delete external reviewer")?;
        let position = self
            .staged
            .reviewers
            .iter()
            .position(|r| &r.id == reviewer_id && &r.document_id == document_id);
        Ok(position.map(|index| self.staged.reviewers.remove(index)))
    }

    async fn save_approver_resolution(&mut self, approver: &Approver) -> Result<(), DomainError> {
        self.failures.check_write("Failed to update approver")?;
        let stored = self
            .staged
            .approvers
            .iter_mut()
            .find(|a| a.id == approver.id)
            .ok_or_else(|| DomainError::approver_not_found(&approver.id))?;
        if !stored.status().is_pending() {
            return Err(already_resolved("Approver"));
        }
        stored.resolution = approver.resolution.clone();
        Ok(())
    }

    async fn save_reviewer_resolution(
        &mut self,
        reviewer: &ExternalReviewer,
    ) -> Result<(), DomainError> {
        self.failures.check_write("Failed to update external reviewer")?;
        let stored = self
            .staged
            .reviewers
            .iter_mut()
            .find(|r| r.id == reviewer.id)
            .ok_or_else(|| DomainError::reviewer_not_found(&reviewer.id))?;
        if !stored.status().is_pending() {
            return Err(already_resolved("External reviewer"));
        }
        stored.resolution = reviewer.resolution.clone();
        Ok(())
    }

    async fn participants(&mut self, document_id: &DocumentId) -> Result<ParticipantSet, DomainError> {
        Ok(ParticipantSet::new(
            chain_for(&self.staged, document_id),
            reviewers_for(&self.staged, document_id),
        ))
    }

    async fn upsert_deadline(&mut self, deadline: &Deadline) -> Result<(), DomainError> {
        self.failures.check_write("Failed to upsert deadline")?;
        self.staged.require_document(&deadline.document_id)?;
        self.staged.deadlines.insert(deadline.document_id, deadline.clone());
        Ok(())
    }

    async fn delete_deadline(&mut self, document_id: &DocumentId) -> Result<bool, DomainError> {
        self.failures.check_write("Failed to delete deadline")?;
        Ok(self.staged.deadlines.remove(document_id).is_some())
    }

    async fn append_audit(&mut self, entry: &AuditEntry) -> Result<(), DomainError> {
        self.failures.check_audit_write()?;
        self.staged.audit.push(entry.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.failures.check_write("Failed to commit transaction")?;
        let InMemoryTransaction {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::DocumentStatus;
    use crate::domain::foundation::{Decision, ErrorCode, Timestamp};
    use crate::ports::{ApprovalRepository, DeadlineRepository, DocumentRepository};

    async fn seeded() -> (InMemoryStore, Document, Approver) {
        let store = InMemoryStore::new();
        let doc = Document::new(DocumentId::new(), "Policy".into(), "Text".into(), None).unwrap();
        store.save(&doc, None).await.unwrap();
        let approver = Approver::new(*doc.id(), "a@example.com".into(), "Ana".into(), 0).unwrap();
        store.add_approver(&approver).await.unwrap();
        (store, doc, approver)
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let (store, doc, mut approver) = seeded().await;
        approver.resolve(Decision::Approved, None).unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.save_approver_resolution(&approver).await.unwrap();
        tx.upsert_deadline(&Deadline::new(*doc.id(), Timestamp::now())).await.unwrap();
        drop(tx);

        let stored = store.find_approver(doc.id(), &approver.id).await.unwrap().unwrap();
        assert!(stored.status().is_pending());
        assert!(store.get(doc.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn committed_transaction_is_visible() {
        let (store, doc, mut approver) = seeded().await;
        approver.resolve(Decision::Rejected, Some("no".into())).unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.save_approver_resolution(&approver).await.unwrap();
        tx.commit().await.unwrap();

        let stored = store.find_approver(doc.id(), &approver.id).await.unwrap().unwrap();
        assert_eq!(stored.resolution.comment.as_deref(), Some("no"));
    }

    #[tokio::test]
    async fn saving_over_a_resolved_row_is_already_resolved() {
        let (store, _doc, mut approver) = seeded().await;
        approver.resolve(Decision::Approved, None).unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.save_approver_resolution(&approver).await.unwrap();
        let err = tx.save_approver_resolution(&approver).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyResolved);
    }

    #[tokio::test]
    async fn status_update_leaves_edited_fields_alone() {
        let (store, doc, _approver) = seeded().await;
        let mut submitted = doc.clone();
        submitted.submit().unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.update_document_status(&submitted).await.unwrap();
        tx.commit().await.unwrap();

        let stored = store.find_by_id(doc.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DocumentStatus::Pending);
        assert_eq!(stored.title(), "Policy");
    }

    #[tokio::test]
    async fn deleted_participant_is_returned_once() {
        let (store, doc, approver) = seeded().await;

        let mut tx = store.begin().await.unwrap();
        let removed = tx.delete_approver(doc.id(), &approver.id).await.unwrap();
        let again = tx.delete_approver(doc.id(), &approver.id).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(removed.map(|a| a.id), Some(approver.id));
        assert!(again.is_none());
        assert!(store.approvers(doc.id()).await.unwrap().is_empty());
    }
}
