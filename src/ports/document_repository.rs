//! Document repository port.
//!
//! Reads documents and writes their editable fields, content history and
//! the embedding column used for similarity search.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::document::{Document, DocumentStatus, DocumentVersion, Embedding};
use crate::domain::foundation::{DocumentId, DomainError, Timestamp};

/// Aggregate counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    /// Approved documents whose last update falls after the cutoff.
    pub approved_this_week: u64,
}

/// Repository port for Document persistence.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Write title, content, author and updated_at, leaving status alone.
    ///
    /// Returns the document as stored afterwards, with its current status.
    /// New documents and status changes go through `DocumentTransaction`.
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the document doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_fields(&self, document: &Document) -> Result<Document, DomainError>;

    /// Replace or clear the stored embedding.
    async fn set_embedding(
        &self,
        id: &DocumentId,
        embedding: Option<&Embedding>,
    ) -> Result<(), DomainError>;

    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError>;

    /// List documents, most recently updated first.
    async fn list(&self, status: Option<DocumentStatus>) -> Result<Vec<Document>, DomainError>;

    /// Delete a document with its versions, participants and deadline.
    /// Audit entries are kept.
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the document doesn't exist
    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError>;

    /// Highest recorded version number, if any.
    async fn latest_version_number(&self, id: &DocumentId) -> Result<Option<u32>, DomainError>;

    async fn append_version(&self, version: &DocumentVersion) -> Result<(), DomainError>;

    /// Content history, newest version first.
    async fn versions(&self, id: &DocumentId) -> Result<Vec<DocumentVersion>, DomainError>;

    /// Counts by status; `approved_since` bounds `approved_this_week`.
    async fn stats(&self, approved_since: Timestamp) -> Result<DocumentStats, DomainError>;
}
