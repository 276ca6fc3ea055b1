//! Audit domain module - append-only record of state-changing actions.

mod action;
mod entry;

pub use action::AuditAction;
pub use entry::AuditEntry;
