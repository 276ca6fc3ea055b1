//! AddApprover - Appends an internal approver to a document's chain.

use std::sync::Arc;

use crate::application::handlers::audit::AuditRecorder;
use crate::domain::approval::{ApprovalError, Approver};
use crate::domain::audit::AuditAction;
use crate::domain::foundation::{Actor, DocumentId};
use crate::ports::DocumentUnitOfWork;

#[derive(Debug, Clone)]
pub struct AddApproverCommand {
    pub document_id: DocumentId,
    pub email: String,
    pub name: String,
    pub order: i32,
    pub actor: Actor,
}

pub struct AddApproverHandler {
    unit_of_work: Arc<dyn DocumentUnitOfWork>,
}

impl AddApproverHandler {
    pub fn new(unit_of_work: Arc<dyn DocumentUnitOfWork>) -> Self {
        Self { unit_of_work }
    }

    pub async fn handle(&self, cmd: AddApproverCommand) -> Result<Approver, ApprovalError> {
        let approver = Approver::new(cmd.document_id, cmd.email, cmd.name, cmd.order)?;

        let mut tx = self.unit_of_work.begin().await?;
        tx.lock_document(&cmd.document_id)
            .await?
            .ok_or(ApprovalError::DocumentNotFound(cmd.document_id))?;
        tx.insert_approver(&approver).await?;
        AuditRecorder::record(
            tx.as_mut(),
            cmd.document_id,
            AuditAction::ApproverAdded,
            &cmd.actor,
            Some(approver.added_details()),
        )
        .await?;
        tx.commit().await?;

        Ok(approver)
    }
}
