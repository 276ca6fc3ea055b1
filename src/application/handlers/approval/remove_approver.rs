//! RemoveApprover - Deletes an approver from a document's chain.
//!
//! The remaining participants are re-aggregated in the same transaction, so
//! removing the last pending approver settles the document when everyone
//! left has responded.

use std::sync::Arc;
use tracing::info;

use crate::application::handlers::audit::AuditRecorder;
use crate::domain::approval::ApprovalError;
use crate::domain::audit::AuditAction;
use crate::domain::foundation::{Actor, ApproverId, DocumentId};
use crate::ports::DocumentUnitOfWork;

use super::settle::settle_document;

#[derive(Debug, Clone)]
pub struct RemoveApproverCommand {
    pub document_id: DocumentId,
    pub approver_id: ApproverId,
    pub actor: Actor,
}

pub struct RemoveApproverHandler {
    unit_of_work: Arc<dyn DocumentUnitOfWork>,
}

impl RemoveApproverHandler {
    pub fn new(unit_of_work: Arc<dyn DocumentUnitOfWork>) -> Self {
        Self { unit_of_work }
    }

    pub async fn handle(&self, cmd: RemoveApproverCommand) -> Result<(), ApprovalError> {
        let mut tx = self.unit_of_work.begin().await?;
        let mut document = tx
            .lock_document(&cmd.document_id)
            .await?
            .ok_or(ApprovalError::DocumentNotFound(cmd.document_id))?;
        let removed = tx
            .delete_approver(&cmd.document_id, &cmd.approver_id)
            .await?
            .ok_or(ApprovalError::ApproverNotFound(cmd.approver_id))?;

        AuditRecorder::record(
            tx.as_mut(),
            cmd.document_id,
            AuditAction::ApproverRemoved,
            &cmd.actor,
            Some(removed.removed_details()),
        )
        .await?;
        let settlement = settle_document(tx.as_mut(), &mut document).await?;
        tx.commit().await?;

        info!(
            document_id = %cmd.document_id,
            approver_id = %cmd.approver_id,
            settled = settlement.settled,
            "approver removed"
        );
        Ok(())
    }
}
