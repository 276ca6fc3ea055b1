//! HTTP handlers for document endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::handlers::document::{
    CreateDocumentCommand, CreateDocumentHandler, DecideDocumentCommand, DecideDocumentHandler,
    DeleteDocumentCommand, DeleteDocumentHandler, DocumentStatsHandler, GetDocumentHandler,
    GetDocumentQuery, ListDocumentsQuery, SubmitDocumentCommand, SubmitDocumentHandler,
    UpdateDocumentCommand, UpdateDocumentHandler,
};
use crate::application::handlers::search::{SearchDocumentsHandler, SearchDocumentsQuery};
use crate::domain::document::{DocumentError, DocumentStatus};
use crate::domain::foundation::{Decision, DocumentId, ErrorCode};

use super::super::common::{
    parse_id, status_for, validation_response, ErrorResponse, SuccessResponse,
};
use super::dto::{
    CreateDocumentRequest, DocumentActionRequest, DocumentDetailResponse, DocumentResponse,
    ListDocumentsParams, SearchHitResponse, SearchParams, StatsResponse, UpdateDocumentRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DocumentHandlers {
    pub create: Arc<CreateDocumentHandler>,
    pub get: Arc<GetDocumentHandler>,
    pub update: Arc<UpdateDocumentHandler>,
    pub delete: Arc<DeleteDocumentHandler>,
    pub submit: Arc<SubmitDocumentHandler>,
    pub decide: Arc<DecideDocumentHandler>,
    pub stats: Arc<DocumentStatsHandler>,
    pub search: Arc<SearchDocumentsHandler>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/documents - List documents, optionally by status
pub async fn list_documents(
    State(handlers): State<DocumentHandlers>,
    Query(params): Query<ListDocumentsParams>,
) -> Response {
    let status = match params.status.as_deref().map(str::parse::<DocumentStatus>) {
        None => None,
        Some(Ok(status)) => Some(status),
        Some(Err(e)) => return validation_response(e),
    };

    match handlers.get.list(ListDocumentsQuery { status }).await {
        Ok(documents) => {
            let body: Vec<DocumentResponse> = documents.iter().map(DocumentResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => handle_document_error(e),
    }
}

/// POST /api/documents - Create a draft
pub async fn create_document(
    State(handlers): State<DocumentHandlers>,
    Json(req): Json<CreateDocumentRequest>,
) -> Response {
    let cmd = CreateDocumentCommand {
        title: req.title,
        content: req.content,
        author: req.author,
        actor: req.actor.into_actor(),
    };

    match handlers.create.handle(cmd).await {
        Ok(document) => (StatusCode::CREATED, Json(DocumentResponse::from(&document))).into_response(),
        Err(e) => handle_document_error(e),
    }
}

/// GET /api/documents/:id - Document with its versions
pub async fn get_document(
    State(handlers): State<DocumentHandlers>,
    Path(id): Path<String>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get.handle(GetDocumentQuery { document_id }).await {
        Ok(view) => (StatusCode::OK, Json(DocumentDetailResponse::from(view))).into_response(),
        Err(e) => handle_document_error(e),
    }
}

/// PUT /api/documents/:id - Partial update of title, content or author
pub async fn update_document(
    State(handlers): State<DocumentHandlers>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };
    if req.status.is_some() {
        return ErrorResponse::bad_request(
            "Status cannot be set directly; use submit, approve or reject",
        )
        .into_response_with(StatusCode::BAD_REQUEST);
    }

    let cmd = UpdateDocumentCommand {
        document_id,
        patch: req.into_patch(),
    };

    match handlers.update.handle(cmd).await {
        Ok(document) => (StatusCode::OK, Json(DocumentResponse::from(&document))).into_response(),
        Err(e) => handle_document_error(e),
    }
}

/// DELETE /api/documents/:id
pub async fn delete_document(
    State(handlers): State<DocumentHandlers>,
    Path(id): Path<String>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.delete.handle(DeleteDocumentCommand { document_id }).await {
        Ok(()) => (StatusCode::OK, Json(SuccessResponse::ok())).into_response(),
        Err(e) => handle_document_error(e),
    }
}

/// POST /api/documents/:id/submit - Send for review
pub async fn submit_document(
    State(handlers): State<DocumentHandlers>,
    Path(id): Path<String>,
    body: Option<Json<DocumentActionRequest>>,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let cmd = SubmitDocumentCommand {
        document_id,
        actor: req.actor.into_actor(),
    };

    match handlers.submit.handle(cmd).await {
        Ok(document) => (StatusCode::OK, Json(DocumentResponse::from(&document))).into_response(),
        Err(e) => handle_document_error(e),
    }
}

/// POST /api/documents/:id/approve
pub async fn approve_document(
    state: State<DocumentHandlers>,
    path: Path<String>,
    body: Option<Json<DocumentActionRequest>>,
) -> Response {
    decide(state, path, body, Decision::Approved).await
}

/// POST /api/documents/:id/reject
pub async fn reject_document(
    state: State<DocumentHandlers>,
    path: Path<String>,
    body: Option<Json<DocumentActionRequest>>,
) -> Response {
    decide(state, path, body, Decision::Rejected).await
}

async fn decide(
    State(handlers): State<DocumentHandlers>,
    Path(id): Path<String>,
    body: Option<Json<DocumentActionRequest>>,
    decision: Decision,
) -> Response {
    let document_id = match parse_id::<DocumentId>(&id, "document") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let cmd = DecideDocumentCommand {
        document_id,
        decision,
        comment: req.comment,
        actor: req.actor.into_actor(),
    };

    match handlers.decide.handle(cmd).await {
        Ok(document) => (StatusCode::OK, Json(DocumentResponse::from(&document))).into_response(),
        Err(e) => handle_document_error(e),
    }
}

/// GET /api/stats - Dashboard totals
pub async fn document_stats(State(handlers): State<DocumentHandlers>) -> Response {
    match handlers.stats.handle().await {
        Ok(stats) => (StatusCode::OK, Json(StatsResponse::from(stats))).into_response(),
        Err(e) => handle_document_error(e),
    }
}

/// GET /api/search?q= - Semantic search
pub async fn search_documents(
    State(handlers): State<DocumentHandlers>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = SearchDocumentsQuery {
        text: params.q.unwrap_or_default(),
    };

    match handlers.search.handle(query).await {
        Ok(hits) => {
            let body: Vec<SearchHitResponse> = hits.iter().map(SearchHitResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => handle_document_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

pub(in crate::adapters::http) fn handle_document_error(error: DocumentError) -> Response {
    let code = error.code();
    let body = match &error {
        DocumentError::ValidationFailed { field, message } => {
            ErrorResponse::new(code, message.clone())
                .with_details(serde_json::json!({ "field": field }))
        }
        DocumentError::NotFound(id) => ErrorResponse::new(code, "Document not found")
            .with_details(serde_json::json!({ "document_id": id.to_string() })),
        DocumentError::InvalidState(message) => ErrorResponse::new(code, message.clone()),
        DocumentError::Infrastructure(message) => {
            error!(error = %message, "document operation failed");
            ErrorResponse::new(ErrorCode::DatabaseError, "Storage temporarily unavailable")
        }
    };
    body.into_response_with(status_for(code))
}
