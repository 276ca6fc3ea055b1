//! Aggregate a document's participants and settle it on a terminal outcome.
//!
//! Runs inside the caller's `DocumentTransaction`, after the document lock
//! is held and the participant change is written.

use tracing::debug;

use crate::application::handlers::audit::AuditRecorder;
use crate::domain::approval::AggregateOutcome;
use crate::domain::audit::AuditAction;
use crate::domain::document::Document;
use crate::domain::foundation::{Actor, DomainError};
use crate::ports::DocumentTransaction;

/// What re-aggregation decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Settlement {
    pub aggregate: AggregateOutcome,
    /// Whether the document moved to a terminal status.
    pub settled: bool,
}

/// Re-read every participant, aggregate, and on a terminal outcome write
/// the new status with a system DOCUMENT_APPROVED or DOCUMENT_REJECTED
/// entry. A document already in a terminal status keeps it.
pub(super) async fn settle_document(
    tx: &mut dyn DocumentTransaction,
    document: &mut Document,
) -> Result<Settlement, DomainError> {
    let document_id = *document.id();
    let participants = tx.participants(&document_id).await?;
    let aggregate = participants.outcome();
    debug!(
        document_id = %document_id,
        participants = participants.len(),
        pending = participants.pending_count(),
        outcome = ?aggregate,
        "aggregated participants"
    );

    let settled = match aggregate.decision() {
        Some(decision) if document.settle(decision) => {
            tx.update_document_status(document).await?;
            AuditRecorder::record(
                tx,
                document_id,
                AuditAction::document_decision(decision),
                &Actor::system(),
                Some(format!("All {} participants responded", participants.len())),
            )
            .await?;
            true
        }
        _ => false,
    };

    Ok(Settlement { aggregate, settled })
}
