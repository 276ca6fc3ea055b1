//! Approval repository port.
//!
//! Reads of approvers and external reviewers. Every write goes through
//! `DocumentTransaction`.

use async_trait::async_trait;

use crate::domain::approval::{Approver, ExternalReviewer, ReviewToken};
use crate::domain::foundation::{ApproverId, DocumentId, DomainError};

#[async_trait]
pub trait ApprovalRepository: Send + Sync {
    /// The approval chain ordered by `order`, then creation time.
    async fn approvers(&self, document_id: &DocumentId) -> Result<Vec<Approver>, DomainError>;

    async fn find_approver(
        &self,
        document_id: &DocumentId,
        approver_id: &ApproverId,
    ) -> Result<Option<Approver>, DomainError>;

    /// External reviewers in the order they were added.
    async fn reviewers(&self, document_id: &DocumentId) -> Result<Vec<ExternalReviewer>, DomainError>;

    async fn find_reviewer_by_token(
        &self,
        token: &ReviewToken,
    ) -> Result<Option<ExternalReviewer>, DomainError>;
}
