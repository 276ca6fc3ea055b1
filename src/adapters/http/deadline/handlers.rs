//! HTTP handlers for deadline endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::deadline::{
    DeadlineHandler, GetDeadlineQuery, RemoveDeadlineCommand, SetDeadlineCommand,
};
use crate::domain::foundation::{DocumentId, Timestamp};

use super::super::common::{parse_id, validation_response, ActorParams, SuccessResponse};
use super::super::document::handle_document_error;
use super::dto::{DeadlineResponse, SetDeadlineRequest};

#[derive(Clone)]
pub struct DeadlineHandlers {
    pub deadlines: Arc<DeadlineHandler>,
}

/// GET /api/documents/:id/deadline
pub async fn get_deadline(
    State(handlers): State<DeadlineHandlers>,
    Path(id): Path<String>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.deadlines.get(GetDeadlineQuery { document_id }).await {
        Ok(Some(view)) => (StatusCode::OK, Json(DeadlineResponse::from(view))).into_response(),
        Ok(None) => (StatusCode::OK, Json(DeadlineResponse::none())).into_response(),
        Err(e) => handle_document_error(e),
    }
}

/// POST /api/documents/:id/deadline - Set or replace
pub async fn set_deadline(
    State(handlers): State<DeadlineHandlers>,
    Path(id): Path<String>,
    Json(req): Json<SetDeadlineRequest>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let due_at = match Timestamp::parse("deadline", &req.deadline) {
        Ok(due_at) => due_at,
        Err(e) => return validation_response(e),
    };

    let cmd = SetDeadlineCommand {
        document_id,
        due_at,
        actor: req.actor.into_actor(),
    };

    match handlers.deadlines.set(cmd).await {
        Ok(deadline) => (StatusCode::OK, Json(DeadlineResponse::from(&deadline))).into_response(),
        Err(e) => handle_document_error(e),
    }
}

/// DELETE /api/documents/:id/deadline
pub async fn remove_deadline(
    State(handlers): State<DeadlineHandlers>,
    Path(id): Path<String>,
    Query(actor): Query<ActorParams>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = RemoveDeadlineCommand {
        document_id,
        actor: actor.into_actor(),
    };

    match handlers.deadlines.remove(cmd).await {
        Ok(_) => (StatusCode::OK, Json(SuccessResponse::ok())).into_response(),
        Err(e) => handle_document_error(e),
    }
}
