//! HTTP adapter for document, stats and search endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateDocumentRequest, DocumentActionRequest, DocumentDetailResponse, DocumentResponse,
    SearchHitResponse, StatsResponse, UpdateDocumentRequest, VersionResponse,
};
pub use handlers::DocumentHandlers;
pub(super) use handlers::handle_document_error;
pub use routes::document_routes;
