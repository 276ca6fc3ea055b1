//! HTTP adapters - REST API implementations.
//!
//! Each module exposes a `XxxHandlers` state struct and a `xxx_routes`
//! function; `crate::app::build_router` merges them.
//!
//! - `document` - Documents, stats and search
//! - `approval` - Approval chain, external reviewers and resolutions
//! - `deadline` - Advisory review deadlines
//! - `audit` - Audit trail queries

pub mod approval;
pub mod audit;
pub mod common;
pub mod deadline;
pub mod document;

pub use approval::{approval_routes, ApprovalHandlers};
pub use audit::{audit_routes, AuditHandlers};
pub use common::ErrorResponse;
pub use deadline::{deadline_routes, DeadlineHandlers};
pub use document::{document_routes, DocumentHandlers};
