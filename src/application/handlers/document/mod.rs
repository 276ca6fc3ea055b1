//! Document command and query handlers.

mod create_document;
mod decide_document;
mod delete_document;
mod document_stats;
mod embed;
mod get_document;
mod submit_document;
mod update_document;

pub use create_document::{CreateDocumentCommand, CreateDocumentHandler};
pub use decide_document::{DecideDocumentCommand, DecideDocumentHandler};
pub use delete_document::{DeleteDocumentCommand, DeleteDocumentHandler};
pub use document_stats::{DocumentStatsHandler, APPROVED_WINDOW_DAYS};
pub use get_document::{DocumentWithVersions, GetDocumentHandler, GetDocumentQuery, ListDocumentsQuery};
pub use submit_document::{SubmitDocumentCommand, SubmitDocumentHandler};
pub use update_document::{UpdateDocumentCommand, UpdateDocumentHandler};
