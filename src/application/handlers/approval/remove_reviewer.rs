//! RemoveReviewer - Revokes an external reviewer and their token.
//!
//! Like approver removal, the remaining participants are re-aggregated
//! before the transaction commits.

use std::sync::Arc;
use tracing::info;

use crate::application::handlers::audit::AuditRecorder;
use crate::domain::approval::ApprovalError;
use crate::domain::audit::AuditAction;
use crate::domain::foundation::{Actor, DocumentId, ReviewerId};
use crate::ports::DocumentUnitOfWork;

use super::settle::settle_document;

#[derive(Debug, Clone)]
pub struct RemoveReviewerCommand {
    pub document_id: DocumentId,
    pub reviewer_id: ReviewerId,
    pub actor: Actor,
}

pub struct RemoveReviewerHandler {
    unit_of_work: Arc<dyn DocumentUnitOfWork>,
}

impl RemoveReviewerHandler {
    pub fn new(unit_of_work: Arc<dyn DocumentUnitOfWork>) -> Self {
        Self { unit_of_work }
    }

    pub async fn handle(&self, cmd: RemoveReviewerCommand) -> Result<(), ApprovalError> {
        let mut tx = self.unit_of_work.begin().await?;
        let mut document = tx
            .lock_document(&cmd.document_id)
            .await?
            .ok_or(ApprovalError::DocumentNotFound(cmd.document_id))?;
        let removed = tx
            .delete_reviewer(&cmd.document_id, &cmd.reviewer_id)
            .await?
            .ok_or(ApprovalError::ReviewerNotFound(cmd.reviewer_id))?;

        AuditRecorder::record(
            tx.as_mut(),
            cmd.document_id,
            AuditAction::ExternalReviewerRemoved,
            &cmd.actor,
            Some(removed.removed_details()),
        )
        .await?;
        let settlement = settle_document(tx.as_mut(), &mut document).await?;
        tx.commit().await?;

        info!(
            document_id = %cmd.document_id,
            reviewer_id = %cmd.reviewer_id,
            settled = settlement.settled,
            "external reviewer removed"
        );
        Ok(())
    }
}
