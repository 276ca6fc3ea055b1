//! HTTP handlers for approval chain, external reviewer and resolution
//! endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::handlers::approval::{
    AddApproverCommand, AddApproverHandler, AddReviewerCommand, AddReviewerHandler,
    ListParticipantsHandler, ListParticipantsQuery, ParticipantRef, RemoveApproverCommand,
    RemoveApproverHandler, RemoveReviewerCommand, RemoveReviewerHandler,
    ResolveParticipantCommand, ResolveParticipantHandler,
};
use crate::domain::approval::{ApprovalError, ReviewToken};
use crate::domain::foundation::{
    Actor, ApproverId, Decision, DocumentId, ErrorCode, ReviewerId, ValidationError,
};

use super::super::common::{
    parse_id, status_for, validation_response, ActorParams, ErrorResponse, SuccessResponse,
};
use super::dto::{
    AddApproverRequest, AddReviewerRequest, ApproverResponse, ExternalRespondRequest,
    ResolutionResponse, ResolveApproverRequest, ReviewerResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ApprovalHandlers {
    pub add_approver: Arc<AddApproverHandler>,
    pub remove_approver: Arc<RemoveApproverHandler>,
    pub add_reviewer: Arc<AddReviewerHandler>,
    pub remove_reviewer: Arc<RemoveReviewerHandler>,
    pub list: Arc<ListParticipantsHandler>,
    pub resolve: Arc<ResolveParticipantHandler>,
}

// ════════════════════════════════════════════════════════════════════════════
// Approval chain
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/documents/:id/approvers - Chain in order
pub async fn list_approvers(
    State(handlers): State<ApprovalHandlers>,
    Path(id): Path<String>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.list.approvers(ListParticipantsQuery { document_id }).await {
        Ok(chain) => {
            let body: Vec<ApproverResponse> = chain.iter().map(ApproverResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => handle_approval_error(e),
    }
}

/// POST /api/documents/:id/approvers - Add an approver
pub async fn add_approver(
    State(handlers): State<ApprovalHandlers>,
    Path(id): Path<String>,
    Json(req): Json<AddApproverRequest>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Some(order) = req.order else {
        return validation_response(ValidationError::empty_field("order"));
    };

    let cmd = AddApproverCommand {
        document_id,
        email: req.email,
        name: req.name,
        order,
        actor: req.actor.into_actor(),
    };

    match handlers.add_approver.handle(cmd).await {
        Ok(approver) => (StatusCode::CREATED, Json(ApproverResponse::from(&approver))).into_response(),
        Err(e) => handle_approval_error(e),
    }
}

/// DELETE /api/documents/:id/approvers/:approver_id
pub async fn remove_approver(
    State(handlers): State<ApprovalHandlers>,
    Path((id, approver_id)): Path<(String, String)>,
    Query(actor): Query<ActorParams>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let approver_id = match parse_id::<ApproverId>(&approver_id, "approver") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = RemoveApproverCommand {
        document_id,
        approver_id,
        actor: actor.into_actor(),
    };

    match handlers.remove_approver.handle(cmd).await {
        Ok(()) => (StatusCode::OK, Json(SuccessResponse::ok())).into_response(),
        Err(e) => handle_approval_error(e),
    }
}

/// POST /api/documents/:id/approvers/:approver_id/resolve
pub async fn resolve_approver(
    State(handlers): State<ApprovalHandlers>,
    Path((id, approver_id)): Path<(String, String)>,
    Json(req): Json<ResolveApproverRequest>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let approver_id = match parse_id::<ApproverId>(&approver_id, "approver") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let decision = match req.status.parse::<Decision>() {
        Ok(decision) => decision,
        Err(e) => return validation_response(e),
    };

    let cmd = ResolveParticipantCommand {
        participant: ParticipantRef::Approver {
            document_id,
            approver_id,
        },
        decision,
        comment: req.comment,
        actor: req.actor.into_actor(),
    };

    resolve(&handlers, cmd).await
}

// ════════════════════════════════════════════════════════════════════════════
// External reviewers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/documents/:id/reviewers
pub async fn list_reviewers(
    State(handlers): State<ApprovalHandlers>,
    Path(id): Path<String>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.list.reviewers(ListParticipantsQuery { document_id }).await {
        Ok(reviewers) => {
            let body: Vec<ReviewerResponse> = reviewers.iter().map(ReviewerResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => handle_approval_error(e),
    }
}

/// POST /api/documents/:id/reviewers - Invite a reviewer; the response
/// carries their token
pub async fn add_reviewer(
    State(handlers): State<ApprovalHandlers>,
    Path(id): Path<String>,
    Json(req): Json<AddReviewerRequest>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = AddReviewerCommand {
        document_id,
        email: req.email,
        name: req.name,
        actor: req.actor.into_actor(),
    };

    match handlers.add_reviewer.handle(cmd).await {
        Ok(reviewer) => (StatusCode::CREATED, Json(ReviewerResponse::from(&reviewer))).into_response(),
        Err(e) => handle_approval_error(e),
    }
}

/// DELETE /api/documents/:id/reviewers/:reviewer_id
pub async fn remove_reviewer(
    State(handlers): State<ApprovalHandlers>,
    Path((id, reviewer_id)): Path<(String, String)>,
    Query(actor): Query<ActorParams>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let reviewer_id = match parse_id::<ReviewerId>(&reviewer_id, "reviewer") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = RemoveReviewerCommand {
        document_id,
        reviewer_id,
        actor: actor.into_actor(),
    };

    match handlers.remove_reviewer.handle(cmd).await {
        Ok(()) => (StatusCode::OK, Json(SuccessResponse::ok())).into_response(),
        Err(e) => handle_approval_error(e),
    }
}

/// POST /api/external/respond - Token-authenticated reviewer decision
pub async fn external_respond(
    State(handlers): State<ApprovalHandlers>,
    Json(req): Json<ExternalRespondRequest>,
) -> Response {
    let token = match ReviewToken::parse(&req.token) {
        Ok(token) => token,
        Err(e) => return validation_response(e),
    };
    let decision = match req.status.parse::<Decision>() {
        Ok(decision) => decision,
        Err(e) => return validation_response(e),
    };

    let cmd = ResolveParticipantCommand {
        participant: ParticipantRef::Token(token),
        decision,
        comment: req.comment,
        actor: Actor::unknown(),
    };

    resolve(&handlers, cmd).await
}

async fn resolve(handlers: &ApprovalHandlers, cmd: ResolveParticipantCommand) -> Response {
    match handlers.resolve.handle(cmd).await {
        Ok(outcome) => (StatusCode::OK, Json(ResolutionResponse::from(outcome))).into_response(),
        Err(e) => handle_approval_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_approval_error(error: ApprovalError) -> Response {
    let code = error.code();
    let body = match &error {
        ApprovalError::ValidationFailed { field, message } => {
            ErrorResponse::new(code, message.clone())
                .with_details(serde_json::json!({ "field": field }))
        }
        ApprovalError::DocumentNotFound(_)
        | ApprovalError::ApproverNotFound(_)
        | ApprovalError::ReviewerNotFound(_)
        | ApprovalError::UnknownToken
        | ApprovalError::AlreadyResolved(_) => ErrorResponse::new(code, error.message()),
        ApprovalError::Infrastructure(message) => {
            error!(error = %message, "approval operation failed");
            ErrorResponse::new(ErrorCode::DatabaseError, "Storage temporarily unavailable")
        }
    };
    body.into_response_with(status_for(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_token_maps_to_404() {
        let response = handle_approval_error(ApprovalError::UnknownToken);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn already_resolved_maps_to_409() {
        let response =
            handle_approval_error(ApprovalError::AlreadyResolved("already responded".into()));
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn infrastructure_maps_to_503() {
        let response = handle_approval_error(ApprovalError::infrastructure("connection reset"));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
