//! AuditRecorder - Appends audit entries for state-changing actions.
//!
//! Every entry is written through the caller's open `DocumentTransaction`,
//! so it commits or rolls back with the mutation it describes. A failed
//! append propagates and aborts that mutation.

use tracing::debug;

use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::foundation::{Actor, DocumentId, DomainError};
use crate::ports::DocumentTransaction;

pub struct AuditRecorder;

impl AuditRecorder {
    /// Append one entry inside `tx`.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if the entry could not be written
    pub async fn record(
        tx: &mut dyn DocumentTransaction,
        document_id: DocumentId,
        action: AuditAction,
        actor: &Actor,
        details: Option<String>,
    ) -> Result<AuditEntry, DomainError> {
        let entry = AuditEntry::new(document_id, action, actor.clone(), details);
        tx.append_audit(&entry).await?;
        debug!(
            document_id = %entry.document_id,
            action = %entry.action,
            actor = %entry.actor.email,
            "audit entry recorded"
        );
        Ok(entry)
    }
}
