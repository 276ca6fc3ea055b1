//! HTTP routes for document endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    approve_document, create_document, delete_document, document_stats, get_document,
    list_documents, reject_document, search_documents, submit_document, update_document,
    DocumentHandlers,
};

pub fn document_routes(handlers: DocumentHandlers) -> Router {
    Router::new()
        .route("/api/documents", get(list_documents).post(create_document))
        .route(
            "/api/documents/:id",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/api/documents/:id/submit", post(submit_document))
        .route("/api/documents/:id/approve", post(approve_document))
        .route("/api/documents/:id/reject", post(reject_document))
        .route("/api/stats", get(document_stats))
        .route("/api/search", get(search_documents))
        .with_state(handlers)
}
