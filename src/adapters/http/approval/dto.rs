//! HTTP DTOs for approval chain, external reviewer and resolution
//! endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::approval::ResolutionOutcome;
use crate::domain::approval::{AggregateOutcome, Approver, ExternalReviewer, ParticipantStatus};
use crate::domain::document::DocumentStatus;
use crate::domain::foundation::Timestamp;

use super::super::common::ActorParams;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct AddApproverRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(flatten)]
    pub actor: ActorParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddReviewerRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub actor: ActorParams,
}

/// Body of an approver resolution. `status` must be `approved` or
/// `rejected`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveApproverRequest {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub actor: ActorParams,
}

/// Body posted by an external reviewer.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalRespondRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub comment: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproverResponse {
    pub id: String,
    pub document_id: String,
    pub email: String,
    pub name: String,
    pub order: i32,
    pub status: ParticipantStatus,
    pub comment: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&Approver> for ApproverResponse {
    fn from(a: &Approver) -> Self {
        Self {
            id: a.id.to_string(),
            document_id: a.document_id.to_string(),
            email: a.email.clone(),
            name: a.name.clone(),
            order: a.order,
            status: a.status(),
            comment: a.resolution.comment.clone(),
            resolved_at: a.resolution.resolved_at,
            created_at: a.created_at,
        }
    }
}

/// External reviewer including the capability token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerResponse {
    pub id: String,
    pub document_id: String,
    pub email: String,
    pub name: String,
    pub token: String,
    pub status: ParticipantStatus,
    pub comment: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&ExternalReviewer> for ReviewerResponse {
    fn from(r: &ExternalReviewer) -> Self {
        Self {
            id: r.id.to_string(),
            document_id: r.document_id.to_string(),
            email: r.email.clone(),
            name: r.name.clone(),
            token: r.token.as_str().to_string(),
            status: r.status(),
            comment: r.resolution.comment.clone(),
            resolved_at: r.resolution.resolved_at,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResponse {
    pub success: bool,
    pub document_id: String,
    pub participant_status: ParticipantStatus,
    pub outcome: AggregateOutcome,
    pub document_status: DocumentStatus,
    pub settled: bool,
}

impl From<ResolutionOutcome> for ResolutionResponse {
    fn from(outcome: ResolutionOutcome) -> Self {
        Self {
            success: true,
            document_id: outcome.document_id.to_string(),
            participant_status: outcome.participant_status,
            outcome: outcome.aggregate,
            document_status: outcome.document_status,
            settled: outcome.settled,
        }
    }
}
