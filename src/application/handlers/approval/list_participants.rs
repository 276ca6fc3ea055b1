//! Participant queries.

use std::sync::Arc;

use crate::domain::approval::{ApprovalError, Approver, ExternalReviewer};
use crate::domain::foundation::DocumentId;
use crate::ports::ApprovalRepository;

#[derive(Debug, Clone)]
pub struct ListParticipantsQuery {
    pub document_id: DocumentId,
}

pub struct ListParticipantsHandler {
    approvals: Arc<dyn ApprovalRepository>,
}

impl ListParticipantsHandler {
    pub fn new(approvals: Arc<dyn ApprovalRepository>) -> Self {
        Self { approvals }
    }

    /// Approval chain ordered by `order`, then creation time.
    pub async fn approvers(&self, query: ListParticipantsQuery) -> Result<Vec<Approver>, ApprovalError> {
        Ok(self.approvals.approvers(&query.document_id).await?)
    }

    pub async fn reviewers(
        &self,
        query: ListParticipantsQuery,
    ) -> Result<Vec<ExternalReviewer>, ApprovalError> {
        Ok(self.approvals.reviewers(&query.document_id).await?)
    }
}
