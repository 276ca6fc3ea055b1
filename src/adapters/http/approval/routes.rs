//! HTTP routes for approval chain, external reviewer and resolution
//! endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    add_approver, add_reviewer, external_respond, list_approvers, list_reviewers,
    remove_approver, remove_reviewer, resolve_approver, ApprovalHandlers,
};

pub fn approval_routes(handlers: ApprovalHandlers) -> Router {
    Router::new()
        .route(
            "/api/documents/:id/approvers",
            get(list_approvers).post(add_approver),
        )
        .route(
            "/api/documents/:id/approvers/:approver_id",
            delete(remove_approver),
        )
        .route(
            "/api/documents/:id/approvers/:approver_id/resolve",
            post(resolve_approver),
        )
        .route(
            "/api/documents/:id/reviewers",
            get(list_reviewers).post(add_reviewer),
        )
        .route(
            "/api/documents/:id/reviewers/:reviewer_id",
            delete(remove_reviewer),
        )
        .route("/api/external/respond", post(external_respond))
        .with_state(handlers)
}
