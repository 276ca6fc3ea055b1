//! HTTP adapter for audit trail endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::AuditEntryResponse;
pub use handlers::AuditHandlers;
pub use routes::audit_routes;
