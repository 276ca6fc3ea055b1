//! Audit recording and queries.

mod audit_recorder;
mod list_audit;

pub use audit_recorder::AuditRecorder;
pub use list_audit::{ListAuditHandler, ListDocumentAuditQuery, ListRecentAuditQuery, MAX_AUDIT_LIMIT};
