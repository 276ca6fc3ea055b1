//! HTTP DTOs for audit endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::foundation::Timestamp;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentAuditParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntryResponse {
    pub id: String,
    pub document_id: String,
    pub action: AuditAction,
    /// Human-readable form of `action`, e.g. "Approver Approved".
    pub action_label: String,
    pub actor_email: String,
    pub actor_name: String,
    pub details: Option<String>,
    pub created_at: Timestamp,
}

impl From<&AuditEntry> for AuditEntryResponse {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            document_id: entry.document_id.to_string(),
            action: entry.action,
            action_label: entry.action.display_label(),
            actor_email: entry.actor.email.clone(),
            actor_name: entry.actor.name.clone(),
            details: entry.details.clone(),
            created_at: entry.created_at,
        }
    }
}
