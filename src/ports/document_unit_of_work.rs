//! Transactional scope for every audited mutation of one document.
//!
//! Creating a document, submitting it, deciding it directly, changing its
//! participants or deadline and resolving a participant all run inside one
//! `DocumentTransaction`. The mutation and its audit entries commit together
//! or not at all.
//!
//! # Locking
//!
//! `lock_document` locks the document row until the transaction ends.
//! Every operation that reads or writes the document's status, participants
//! or deadline takes that lock first, so status transitions and aggregation
//! run one at a time per document. Participant row locks are only taken
//! while the document lock is held, which keeps the lock order
//! document before participant everywhere (a cascading document delete
//! takes them in the same order).
//!
//! Dropping a transaction without `commit` rolls it back.

use async_trait::async_trait;

use crate::domain::approval::{Approver, ExternalReviewer, ParticipantSet, ReviewToken};
use crate::domain::audit::AuditEntry;
use crate::domain::document::{Deadline, Document, Embedding};
use crate::domain::foundation::{ApproverId, DocumentId, DomainError, ReviewerId};

/// Opens document transactions.
#[async_trait]
pub trait DocumentUnitOfWork: Send + Sync {
    /// # Errors
    ///
    /// - `DatabaseError` if no transaction could be started
    async fn begin(&self) -> Result<Box<dyn DocumentTransaction>, DomainError>;
}

/// One open document transaction.
#[async_trait]
pub trait DocumentTransaction: Send {
    /// Lock the document row for the rest of the transaction.
    ///
    /// Returns `None` if the document doesn't exist.
    async fn lock_document(&mut self, id: &DocumentId) -> Result<Option<Document>, DomainError>;

    /// Insert a new document, optionally with its content embedding.
    async fn insert_document(
        &mut self,
        document: &Document,
        embedding: Option<&Embedding>,
    ) -> Result<(), DomainError>;

    /// Write the document's status and updated_at.
    async fn update_document_status(&mut self, document: &Document) -> Result<(), DomainError>;

    async fn find_approver(
        &mut self,
        document_id: &DocumentId,
        approver_id: &ApproverId,
    ) -> Result<Option<Approver>, DomainError>;

    /// Look up a reviewer by token, locking its document before the
    /// reviewer row.
    async fn find_reviewer_by_token(
        &mut self,
        token: &ReviewToken,
    ) -> Result<Option<ExternalReviewer>, DomainError>;

    async fn insert_approver(&mut self, approver: &Approver) -> Result<(), DomainError>;

    /// Delete an approver, returning the removed row.
    async fn delete_approver(
        &mut self,
        document_id: &DocumentId,
        approver_id: &ApproverId,
    ) -> Result<Option<Approver>, DomainError>;

    async fn insert_reviewer(&mut self, reviewer: &ExternalReviewer) -> Result<(), DomainError>;

    /// Delete a reviewer, returning the removed row.
    async fn delete_reviewer(
        &mut self,
        document_id: &DocumentId,
        reviewer_id: &ReviewerId,
    ) -> Result<Option<ExternalReviewer>, DomainError>;

    /// Persist status, comment and resolved_at of a pending approver.
    ///
    /// # Errors
    ///
    /// - `AlreadyResolved` if the stored row is no longer pending
    async fn save_approver_resolution(&mut self, approver: &Approver) -> Result<(), DomainError>;

    /// Persist status, comment and resolved_at of a pending reviewer.
    ///
    /// # Errors
    ///
    /// - `AlreadyResolved` if the stored row is no longer pending
    async fn save_reviewer_resolution(
        &mut self,
        reviewer: &ExternalReviewer,
    ) -> Result<(), DomainError>;

    /// All approvers and reviewers of the document as currently written.
    async fn participants(&mut self, document_id: &DocumentId) -> Result<ParticipantSet, DomainError>;

    /// Insert or replace the document's deadline.
    async fn upsert_deadline(&mut self, deadline: &Deadline) -> Result<(), DomainError>;

    /// Returns `true` if a deadline existed.
    async fn delete_deadline(&mut self, document_id: &DocumentId) -> Result<bool, DomainError>;

    async fn append_audit(&mut self, entry: &AuditEntry) -> Result<(), DomainError>;

    /// Make every write of this transaction visible and release the lock.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}
