//! ResolveParticipant - Records one approver or reviewer decision and
//! settles the document when every participant has responded.
//!
//! The whole sequence runs inside one `DocumentTransaction`:
//!
//! 1. Lock the document, then the participant
//! 2. Persist the participant's status, comment and resolved_at
//! 3. Append the decision audit entry
//! 4. Re-read every participant of the document and aggregate
//! 5. On a terminal outcome, update the document and append
//!    DOCUMENT_APPROVED or DOCUMENT_REJECTED as the system actor
//! 6. Commit
//!
//! Any error drops the transaction, which rolls every step back.

use std::sync::Arc;
use tracing::info;

use crate::application::handlers::audit::AuditRecorder;
use crate::domain::approval::{AggregateOutcome, ApprovalError, ParticipantStatus, ReviewToken};
use crate::domain::audit::AuditAction;
use crate::domain::document::{Document, DocumentStatus};
use crate::domain::foundation::{Actor, ApproverId, Decision, DocumentId};
use crate::ports::{DocumentTransaction, DocumentUnitOfWork};

use super::settle::settle_document;

/// How the caller identifies the participant being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantRef {
    /// Internal approver, addressed through its document.
    Approver {
        document_id: DocumentId,
        approver_id: ApproverId,
    },
    /// External reviewer, addressed by capability token alone.
    Token(ReviewToken),
}

#[derive(Debug, Clone)]
pub struct ResolveParticipantCommand {
    pub participant: ParticipantRef,
    pub decision: Decision,
    pub comment: Option<String>,
    /// Caller identity for approvers. Ignored for token resolutions, which
    /// act as the reviewer on file.
    pub actor: Actor,
}

/// What a resolution did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOutcome {
    pub document_id: DocumentId,
    pub participant_status: ParticipantStatus,
    pub aggregate: AggregateOutcome,
    pub document_status: DocumentStatus,
    /// Whether this resolution moved the document to a terminal status.
    pub settled: bool,
}

/// Participant after the decision was persisted.
struct Resolved {
    document: Document,
    status: ParticipantStatus,
    action: AuditAction,
    actor: Actor,
    comment: Option<String>,
}

pub struct ResolveParticipantHandler {
    unit_of_work: Arc<dyn DocumentUnitOfWork>,
}

impl ResolveParticipantHandler {
    pub fn new(unit_of_work: Arc<dyn DocumentUnitOfWork>) -> Self {
        Self { unit_of_work }
    }

    /// # Errors
    ///
    /// - `DocumentNotFound`, `ApproverNotFound` or `UnknownToken` if the
    ///   participant can't be found
    /// - `AlreadyResolved` if the participant already responded
    /// - `Infrastructure` if storage failed; nothing was persisted
    pub async fn handle(
        &self,
        cmd: ResolveParticipantCommand,
    ) -> Result<ResolutionOutcome, ApprovalError> {
        let mut tx = self.unit_of_work.begin().await?;

        // 1-2. Lock, resolve and persist the participant
        let resolved = match cmd.participant {
            ParticipantRef::Approver {
                document_id,
                approver_id,
            } => {
                resolve_approver(
                    tx.as_mut(),
                    document_id,
                    approver_id,
                    cmd.decision,
                    cmd.comment,
                    cmd.actor,
                )
                .await?
            }
            ParticipantRef::Token(token) => {
                resolve_reviewer(tx.as_mut(), &token, cmd.decision, cmd.comment).await?
            }
        };
        let Resolved {
            mut document,
            status,
            action,
            actor,
            comment,
        } = resolved;
        let document_id = *document.id();

        // 3. Decision audit entry
        AuditRecorder::record(tx.as_mut(), document_id, action, &actor, comment).await?;

        // 4-5. Aggregate over everyone, including the row just written, and
        // settle the document on a terminal outcome
        let settlement = settle_document(tx.as_mut(), &mut document).await?;
        let settled = settlement.settled;

        // 6. Commit
        tx.commit().await?;

        info!(
            document_id = %document_id,
            action = %action,
            actor = %actor.email,
            settled,
            document_status = %document.status(),
            "participant resolved"
        );

        Ok(ResolutionOutcome {
            document_id,
            participant_status: status,
            aggregate: settlement.aggregate,
            document_status: document.status(),
            settled,
        })
    }
}

async fn resolve_approver(
    tx: &mut dyn DocumentTransaction,
    document_id: DocumentId,
    approver_id: ApproverId,
    decision: Decision,
    comment: Option<String>,
    actor: Actor,
) -> Result<Resolved, ApprovalError> {
    let document = tx
        .lock_document(&document_id)
        .await?
        .ok_or(ApprovalError::DocumentNotFound(document_id))?;
    let mut approver = tx
        .find_approver(&document_id, &approver_id)
        .await?
        .ok_or(ApprovalError::ApproverNotFound(approver_id))?;

    approver.resolve(decision, comment)?;
    tx.save_approver_resolution(&approver).await?;

    Ok(Resolved {
        document,
        status: approver.status(),
        action: AuditAction::approver_decision(decision),
        actor,
        comment: approver.resolution.comment,
    })
}

async fn resolve_reviewer(
    tx: &mut dyn DocumentTransaction,
    token: &ReviewToken,
    decision: Decision,
    comment: Option<String>,
) -> Result<Resolved, ApprovalError> {
    // The reviewer row names the document; the adapter locks that document
    // before the reviewer row.
    let mut reviewer = tx
        .find_reviewer_by_token(token)
        .await?
        .ok_or(ApprovalError::UnknownToken)?;
    let document = tx
        .lock_document(&reviewer.document_id)
        .await?
        .ok_or(ApprovalError::DocumentNotFound(reviewer.document_id))?;

    reviewer.resolve(decision, comment)?;
    tx.save_reviewer_resolution(&reviewer).await?;

    Ok(Resolved {
        document,
        status: reviewer.status(),
        action: AuditAction::reviewer_decision(decision),
        actor: Actor::new(reviewer.email, reviewer.name),
        comment: reviewer.resolution.comment,
    })
}
