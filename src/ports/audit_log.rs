//! Audit log port - queries over the append-only audit trail.
//!
//! Entries are appended through `DocumentTransaction::append_audit`.

use async_trait::async_trait;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{DocumentId, DomainError};

/// Default number of entries returned by the global feed.
pub const DEFAULT_AUDIT_LIMIT: u32 = 100;

#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Trail of one document, oldest first.
    async fn list_for_document(&self, document_id: &DocumentId) -> Result<Vec<AuditEntry>, DomainError>;

    /// Most recent entries across all documents, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError>;
}
