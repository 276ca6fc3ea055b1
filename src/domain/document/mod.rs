//! Document domain module.
//!
//! Documents, their content history, review deadlines and the embedding value
//! object used for similarity search.

mod aggregate;
mod deadline;
mod embedding;
mod errors;
mod status;
mod version;

pub use aggregate::{Document, DocumentPatch, PatchOutcome, DEFAULT_AUTHOR, MAX_TITLE_LENGTH};
pub use deadline::Deadline;
pub use embedding::{Embedding, EMBEDDING_DIMENSIONS};
pub use errors::DocumentError;
pub use status::DocumentStatus;
pub use version::DocumentVersion;
