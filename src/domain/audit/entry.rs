//! Immutable audit trail entry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Actor, AuditEntryId, DocumentId, Timestamp};

use super::AuditAction;

/// One recorded action. Entries are never updated or deleted, and outlive
/// the document they reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub document_id: DocumentId,
    pub action: AuditAction,
    pub actor: Actor,
    pub details: Option<String>,
    pub created_at: Timestamp,
}

impl AuditEntry {
    pub fn new(
        document_id: DocumentId,
        action: AuditAction,
        actor: Actor,
        details: Option<String>,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            document_id,
            action,
            actor,
            details: details.filter(|d| !d.trim().is_empty()),
            created_at: Timestamp::now(),
        }
    }
}
