//! HTTP handlers for audit endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::audit::{
    ListAuditHandler, ListDocumentAuditQuery, ListRecentAuditQuery,
};
use crate::domain::audit::AuditEntry;
use crate::domain::foundation::DocumentId;

use super::super::common::parse_id;
use super::super::document::handle_document_error;
use super::dto::{AuditEntryResponse, RecentAuditParams};

#[derive(Clone)]
pub struct AuditHandlers {
    pub list: Arc<ListAuditHandler>,
}

fn entries_response(entries: &[AuditEntry]) -> Response {
    let body: Vec<AuditEntryResponse> = entries.iter().map(AuditEntryResponse::from).collect();
    (StatusCode::OK, Json(body)).into_response()
}

/// GET /api/documents/:id/audit - Trail of one document, oldest first
pub async fn document_audit(
    State(handlers): State<AuditHandlers>,
    Path(id): Path<String>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.list.for_document(ListDocumentAuditQuery { document_id }).await {
        Ok(entries) => entries_response(&entries),
        Err(e) => handle_document_error(e),
    }
}

/// GET /api/audit?limit= - Newest entries across all documents
pub async fn recent_audit(
    State(handlers): State<AuditHandlers>,
    Query(params): Query<RecentAuditParams>,
) -> Response {
    match handlers.list.recent(ListRecentAuditQuery { limit: params.limit }).await {
        Ok(entries) => entries_response(&entries),
        Err(e) => handle_document_error(e),
    }
}
