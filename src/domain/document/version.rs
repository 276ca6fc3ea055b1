//! Content snapshots kept each time a document's content changes.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DocumentId, Timestamp, VersionId};

/// One historical snapshot of a document's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub id: VersionId,
    pub document_id: DocumentId,
    pub content: String,
    /// 1-based, increasing per document.
    pub version_number: u32,
    pub created_at: Timestamp,
}

impl DocumentVersion {
    /// Builds the snapshot that follows `latest` (or the first one when
    /// the document has no versions yet).
    pub fn next(document_id: DocumentId, content: String, latest: Option<u32>) -> Self {
        Self {
            id: VersionId::new(),
            document_id,
            content,
            version_number: latest.map_or(1, |n| n.saturating_add(1)),
            created_at: Timestamp::now(),
        }
    }
}
