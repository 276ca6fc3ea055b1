//! HTTP adapter for deadline endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{DeadlineResponse, SetDeadlineRequest};
pub use handlers::DeadlineHandlers;
pub use routes::deadline_routes;
