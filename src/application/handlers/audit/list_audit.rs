//! Audit trail queries.

use std::sync::Arc;

use crate::domain::audit::AuditEntry;
use crate::domain::document::DocumentError;
use crate::domain::foundation::DocumentId;
use crate::ports::{AuditLog, DEFAULT_AUDIT_LIMIT};

/// Largest page the global feed serves.
pub const MAX_AUDIT_LIMIT: u32 = 1000;

/// Trail of one document, oldest first. Works for deleted documents too.
#[derive(Debug, Clone)]
pub struct ListDocumentAuditQuery {
    pub document_id: DocumentId,
}

/// Most recent entries across all documents.
#[derive(Debug, Clone, Default)]
pub struct ListRecentAuditQuery {
    pub limit: Option<u32>,
}

impl ListRecentAuditQuery {
    /// Requested limit, defaulted and clamped to `1..=MAX_AUDIT_LIMIT`.
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_AUDIT_LIMIT)
            .clamp(1, MAX_AUDIT_LIMIT)
    }
}

pub struct ListAuditHandler {
    log: Arc<dyn AuditLog>,
}

impl ListAuditHandler {
    pub fn new(log: Arc<dyn AuditLog>) -> Self {
        Self { log }
    }

    pub async fn for_document(
        &self,
        query: ListDocumentAuditQuery,
    ) -> Result<Vec<AuditEntry>, DocumentError> {
        Ok(self.log.list_for_document(&query.document_id).await?)
    }

    pub async fn recent(&self, query: ListRecentAuditQuery) -> Result<Vec<AuditEntry>, DocumentError> {
        Ok(self.log.list_recent(query.effective_limit()).await?)
    }
}
