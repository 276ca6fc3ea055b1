use axum::{routing::get, Router};

use super::handlers::{get_deadline, remove_deadline, set_deadline, DeadlineHandlers};

pub fn deadline_routes(handlers: DeadlineHandlers) -> Router {
    Router::new()
        .route(
            "/api/documents/:id/deadline",
            get(get_deadline).post(set_deadline).delete(remove_deadline),
        )
        .with_state(handlers)
}
