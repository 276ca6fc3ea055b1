use axum::{routing::get, Router};

use super::handlers::{document_audit, recent_audit, AuditHandlers};

pub fn audit_routes(handlers: AuditHandlers) -> Router {
    Router::new()
        .route("/api/documents/:id/audit", get(document_audit))
        .route("/api/audit", get(recent_audit))
        .with_state(handlers)
}
