//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and the state machine
//! trait shared by the document, approval and audit modules.

mod actor;
mod decision;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use actor::{Actor, UNKNOWN_ACTOR_EMAIL, UNKNOWN_ACTOR_NAME};
pub use decision::Decision;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ApproverId, AuditEntryId, DocumentId, ReviewerId, VersionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
