//! Review deadline commands and query.
//!
//! A deadline is advisory: nothing in the approval flow reads it. Set and
//! remove hold the document lock and commit together with their audit
//! entry.

use std::sync::Arc;

use crate::application::handlers::audit::AuditRecorder;
use crate::domain::audit::AuditAction;
use crate::domain::document::{Deadline, DocumentError};
use crate::domain::foundation::{Actor, DocumentId, Timestamp};
use crate::ports::{DeadlineRepository, DocumentTransaction, DocumentUnitOfWork};

#[derive(Debug, Clone)]
pub struct SetDeadlineCommand {
    pub document_id: DocumentId,
    pub due_at: Timestamp,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct RemoveDeadlineCommand {
    pub document_id: DocumentId,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct GetDeadlineQuery {
    pub document_id: DocumentId,
}

/// A deadline together with its overdue flag at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineView {
    pub deadline: Deadline,
    pub overdue: bool,
}

pub struct DeadlineHandler {
    deadlines: Arc<dyn DeadlineRepository>,
    unit_of_work: Arc<dyn DocumentUnitOfWork>,
}

impl DeadlineHandler {
    pub fn new(
        deadlines: Arc<dyn DeadlineRepository>,
        unit_of_work: Arc<dyn DocumentUnitOfWork>,
    ) -> Self {
        Self {
            deadlines,
            unit_of_work,
        }
    }

    async fn begin_on(
        &self,
        document_id: &DocumentId,
    ) -> Result<Box<dyn DocumentTransaction>, DocumentError> {
        let mut tx = self.unit_of_work.begin().await?;
        tx.lock_document(document_id)
            .await?
            .ok_or(DocumentError::NotFound(*document_id))?;
        Ok(tx)
    }

    /// Create or replace the document's deadline.
    pub async fn set(&self, cmd: SetDeadlineCommand) -> Result<Deadline, DocumentError> {
        let deadline = Deadline::new(cmd.document_id, cmd.due_at);

        let mut tx = self.begin_on(&cmd.document_id).await?;
        tx.upsert_deadline(&deadline).await?;
        AuditRecorder::record(
            tx.as_mut(),
            cmd.document_id,
            AuditAction::DeadlineSet,
            &cmd.actor,
            Some(deadline.audit_details()),
        )
        .await?;
        tx.commit().await?;

        Ok(deadline)
    }

    pub async fn get(&self, query: GetDeadlineQuery) -> Result<Option<DeadlineView>, DocumentError> {
        let now = Timestamp::now();
        Ok(self
            .deadlines
            .get(&query.document_id)
            .await?
            .map(|deadline| DeadlineView {
                overdue: deadline.is_overdue_at(&now),
                deadline,
            }))
    }

    /// Remove the deadline. Removing a missing deadline succeeds and
    /// records nothing; a missing document is `NotFound`.
    pub async fn remove(&self, cmd: RemoveDeadlineCommand) -> Result<bool, DocumentError> {
        let mut tx = self.begin_on(&cmd.document_id).await?;
        let removed = tx.delete_deadline(&cmd.document_id).await?;
        if removed {
            AuditRecorder::record(
                tx.as_mut(),
                cmd.document_id,
                AuditAction::DeadlineRemoved,
                &cmd.actor,
                None,
            )
            .await?;
            tx.commit().await?;
        }
        Ok(removed)
    }
}
