//! HTTP DTOs for document endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::document::DocumentWithVersions;
use crate::domain::document::{Document, DocumentPatch, DocumentStatus, DocumentVersion};
use crate::domain::foundation::Timestamp;
use crate::ports::{DocumentStats, SearchHit};

use super::super::common::ActorParams;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Missing fields deserialize as empty and fail domain validation with 400.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(flatten)]
    pub actor: ActorParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDocumentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Rejected when present; status moves only through workflow actions.
    #[serde(default)]
    pub status: Option<serde_json::Value>,
}

impl UpdateDocumentRequest {
    pub fn into_patch(self) -> DocumentPatch {
        DocumentPatch {
            title: self.title,
            content: self.content,
            author: self.author,
        }
    }
}

/// Body of submit, approve and reject. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentActionRequest {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub actor: ActorParams,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDocumentsParams {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub status: DocumentStatus,
    pub author: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Document> for DocumentResponse {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id().to_string(),
            title: doc.title().to_string(),
            content: doc.content().to_string(),
            status: doc.status(),
            author: doc.author().to_string(),
            created_at: *doc.created_at(),
            updated_at: *doc.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub id: String,
    pub document_id: String,
    pub content: String,
    pub version_number: u32,
    pub created_at: Timestamp,
}

impl From<&DocumentVersion> for VersionResponse {
    fn from(v: &DocumentVersion) -> Self {
        Self {
            id: v.id.to_string(),
            document_id: v.document_id.to_string(),
            content: v.content.clone(),
            version_number: v.version_number,
            created_at: v.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDetailResponse {
    pub document: DocumentResponse,
    pub versions: Vec<VersionResponse>,
}

impl From<DocumentWithVersions> for DocumentDetailResponse {
    fn from(view: DocumentWithVersions) -> Self {
        Self {
            document: DocumentResponse::from(&view.document),
            versions: view.versions.iter().map(VersionResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHitResponse {
    #[serde(flatten)]
    pub document: DocumentResponse,
    pub similarity: f64,
}

impl From<&SearchHit> for SearchHitResponse {
    fn from(hit: &SearchHit) -> Self {
        Self {
            document: DocumentResponse::from(&hit.document),
            similarity: hit.similarity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub this_week: u64,
}

impl From<DocumentStats> for StatsResponse {
    fn from(stats: DocumentStats) -> Self {
        Self {
            total: stats.total,
            pending: stats.pending,
            approved: stats.approved,
            this_week: stats.approved_this_week,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_camel_case_actor() {
        let req: CreateDocumentRequest = serde_json::from_str(
            r#"{"title":"T","content":"C","actorEmail":"a@example.com","actorName":"A"}"#,
        )
        .unwrap();
        assert_eq!(req.actor.actor_email.as_deref(), Some("a@example.com"));
        assert!(req.author.is_none());
    }

    #[test]
    fn create_request_defaults_missing_fields() {
        let req: CreateDocumentRequest = serde_json::from_str("{}").unwrap();
        assert!(req.title.is_empty());
        assert!(req.content.is_empty());
    }

    #[test]
    fn search_hit_flattens_document() {
        let doc = Document::new(
            crate::domain::foundation::DocumentId::new(),
            "T".into(),
            "C".into(),
            None,
        )
        .unwrap();
        let hit = SearchHit {
            document: doc,
            similarity: 0.5,
        };
        let json = serde_json::to_value(SearchHitResponse::from(&hit)).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["similarity"], 0.5);
    }
}
