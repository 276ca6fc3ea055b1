//! In-memory storage backing every persistence port.
//!
//! All tables live behind one async mutex. A document transaction takes
//! the mutex for its whole lifetime, so audited mutations are serialized
//! and the read ports wait for an open transaction to finish.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::approval::{Approver, ExternalReviewer, ReviewToken};
use crate::domain::audit::AuditEntry;
use crate::domain::document::{Deadline, Document, DocumentStatus, DocumentVersion, Embedding};
use crate::domain::foundation::{ApproverId, DocumentId, DomainError, ErrorCode, Timestamp};
use crate::ports::{
    ApprovalRepository, AuditLog, DeadlineRepository, DocumentRepository, DocumentSearch,
    DocumentStats, SearchHit,
};

#[derive(Debug, Clone)]
pub(super) struct StoredDocument {
    pub document: Document,
    pub embedding: Option<Embedding>,
}

/// Every table of the store.
#[derive(Debug, Clone, Default)]
pub(super) struct Tables {
    pub documents: HashMap<DocumentId, StoredDocument>,
    pub versions: Vec<DocumentVersion>,
    pub approvers: Vec<Approver>,
    pub reviewers: Vec<ExternalReviewer>,
    pub deadlines: HashMap<DocumentId, Deadline>,
    pub audit: Vec<AuditEntry>,
}

impl Tables {
    pub fn require_document(&self, id: &DocumentId) -> Result<(), DomainError> {
        if self.documents.contains_key(id) {
            Ok(())
        } else {
            Err(DomainError::document_not_found(id))
        }
    }

    pub fn insert_document(&mut self, document: &Document, embedding: Option<&Embedding>) {
        self.documents.insert(
            *document.id(),
            StoredDocument {
                document: document.clone(),
                embedding: embedding.cloned(),
            },
        );
    }

    pub fn insert_approver(&mut self, approver: &Approver) -> Result<(), DomainError> {
        self.require_document(&approver.document_id)?;
        self.approvers.push(approver.clone());
        Ok(())
    }

    pub fn insert_reviewer(&mut self, reviewer: &ExternalReviewer) -> Result<(), DomainError> {
        self.require_document(&reviewer.document_id)?;
        if self.reviewers.iter().any(|r| r.token == reviewer.token) {
            return Err(DomainError::database(
                "Failed to insert external reviewer",
                "duplicate token",
            ));
        }
        self.reviewers.push(reviewer.clone());
        Ok(())
    }
}

/// Failure switches for exercising error paths.
#[derive(Debug, Default)]
pub(super) struct FailureFlags {
    pub writes: AtomicBool,
    pub audit_writes: AtomicBool,
}

impl FailureFlags {
    pub fn check_write(&self, what: &str) -> Result<(), DomainError> {
        if self.writes.load(Ordering::SeqCst) {
            return Err(DomainError::database(what, "simulated storage failure"));
        }
        Ok(())
    }

    pub fn check_audit_write(&self) -> Result<(), DomainError> {
        self.check_write("Failed to record audit entry")?;
        if self.audit_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database(
                "Failed to record audit entry",
                "simulated storage failure",
            ));
        }
        Ok(())
    }
}

/// Shared in-memory store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub(super) tables: Arc<Mutex<Tables>>,
    pub(super) failures: Arc<FailureFlags>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Make every write fail with a `DatabaseError`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.failures.writes.store(fail, Ordering::SeqCst);
    }

    /// Make only audit appends fail with a `DatabaseError`.
    pub fn set_fail_audit_writes(&self, fail: bool) {
        self.failures.audit_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed a document without an audit entry.
    pub async fn save(&self, document: &Document, embedding: Option<&Embedding>) -> Result<(), DomainError> {
        self.failures.check_write("Failed to insert document")?;
        self.tables.lock().await.insert_document(document, embedding);
        Ok(())
    }

    /// Seed an approver without an audit entry.
    pub async fn add_approver(&self, approver: &Approver) -> Result<(), DomainError> {
        self.failures.check_write("Failed to insert approver")?;
        self.tables.lock().await.insert_approver(approver)
    }

    /// Seed an external reviewer without an audit entry.
    pub async fn add_reviewer(&self, reviewer: &ExternalReviewer) -> Result<(), DomainError> {
        self.failures.check_write("Failed to insert external reviewer")?;
        self.tables.lock().await.insert_reviewer(reviewer)
    }

    /// Overwrite a stored document's status, bypassing its state machine.
    pub async fn force_status(&self, id: &DocumentId, status: DocumentStatus) {
        if let Some(stored) = self.tables.lock().await.documents.get_mut(id) {
            let doc = &stored.document;
            stored.document = Document::reconstitute(
                *doc.id(),
                doc.title().to_string(),
                doc.content().to_string(),
                status,
                doc.author().to_string(),
                *doc.created_at(),
                Timestamp::now(),
            );
        }
    }

    pub async fn audit_count(&self) -> usize {
        self.tables.lock().await.audit.len()
    }

    pub async fn has_embedding(&self, id: &DocumentId) -> bool {
        self.tables
            .lock()
            .await
            .documents
            .get(id)
            .is_some_and(|stored| stored.embedding.is_some())
    }
}

fn sort_chain(approvers: &mut [Approver]) {
    approvers.sort_by(|a, b| a.order.cmp(&b.order).then(a.created_at.cmp(&b.created_at)));
}

pub(super) fn chain_for(tables: &Tables, document_id: &DocumentId) -> Vec<Approver> {
    let mut chain: Vec<Approver> = tables
        .approvers
        .iter()
        .filter(|a| &a.document_id == document_id)
        .cloned()
        .collect();
    sort_chain(&mut chain);
    chain
}

pub(super) fn reviewers_for(tables: &Tables, document_id: &DocumentId) -> Vec<ExternalReviewer> {
    let mut reviewers: Vec<ExternalReviewer> = tables
        .reviewers
        .iter()
        .filter(|r| &r.document_id == document_id)
        .cloned()
        .collect();
    reviewers.sort_by_key(|r| r.created_at);
    reviewers
}

#[async_trait]
impl DocumentRepository for InMemoryStore {
    async fn update_fields(&self, document: &Document) -> Result<Document, DomainError> {
        self.failures.check_write("Failed to update document")?;
        let mut tables = self.tables.lock().await;
        let stored = tables
            .documents
            .get_mut(document.id())
            .ok_or_else(|| DomainError::document_not_found(document.id()))?;
        let current = &stored.document;
        stored.document = Document::reconstitute(
            *current.id(),
            document.title().to_string(),
            document.content().to_string(),
            current.status(),
            document.author().to_string(),
            *current.created_at(),
            *document.updated_at(),
        );
        Ok(stored.document.clone())
    }

    async fn set_embedding(
        &self,
        id: &DocumentId,
        embedding: Option<&Embedding>,
    ) -> Result<(), DomainError> {
        self.failures.check_write("Failed to store embedding")?;
        let mut tables = self.tables.lock().await;
        let stored = tables
            .documents
            .get_mut(id)
            .ok_or_else(|| DomainError::document_not_found(id))?;
        stored.embedding = embedding.cloned();
        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let tables = self.tables.lock().await;
        Ok(tables.documents.get(id).map(|stored| stored.document.clone()))
    }

    async fn list(&self, status: Option<DocumentStatus>) -> Result<Vec<Document>, DomainError> {
        let tables = self.tables.lock().await;
        let mut documents: Vec<Document> = tables
            .documents
            .values()
            .map(|stored| stored.document.clone())
            .filter(|doc| status.map_or(true, |s| doc.status() == s))
            .collect();
        documents.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        Ok(documents)
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError> {
        self.failures.check_write("Failed to delete document")?;
        let mut tables = self.tables.lock().await;
        if tables.documents.remove(id).is_none() {
            return Err(DomainError::document_not_found(id));
        }
        tables.versions.retain(|v| &v.document_id != id);
        tables.approvers.retain(|a| &a.document_id != id);
        tables.reviewers.retain(|r| &r.document_id != id);
        tables.deadlines.remove(id);
        Ok(())
    }

    async fn latest_version_number(&self, id: &DocumentId) -> Result<Option<u32>, DomainError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .versions
            .iter()
            .filter(|v| &v.document_id == id)
            .map(|v| v.version_number)
            .max())
    }

    async fn append_version(&self, version: &DocumentVersion) -> Result<(), DomainError> {
        self.failures.check_write("Failed to insert document version")?;
        let mut tables = self.tables.lock().await;
        tables.require_document(&version.document_id)?;
        let taken = tables.versions.iter().any(|v| {
            v.document_id == version.document_id && v.version_number == version.version_number
        });
        if taken {
            return Err(DomainError::database(
                "Failed to insert document version",
                format!("version {} already exists", version.version_number),
            ));
        }
        tables.versions.push(version.clone());
        Ok(())
    }

    async fn versions(&self, id: &DocumentId) -> Result<Vec<DocumentVersion>, DomainError> {
        let tables = self.tables.lock().await;
        let mut versions: Vec<DocumentVersion> = tables
            .versions
            .iter()
            .filter(|v| &v.document_id == id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(versions)
    }

    async fn stats(&self, approved_since: Timestamp) -> Result<DocumentStats, DomainError> {
        let tables = self.tables.lock().await;
        let mut stats = DocumentStats::default();
        for stored in tables.documents.values() {
            let doc = &stored.document;
            stats.total += 1;
            match doc.status() {
                DocumentStatus::Pending => stats.pending += 1,
                DocumentStatus::Approved => {
                    stats.approved += 1;
                    if doc.updated_at().is_after(&approved_since) {
                        stats.approved_this_week += 1;
                    }
                }
                DocumentStatus::Draft | DocumentStatus::Rejected => {}
            }
        }
        Ok(stats)
    }
}

#[async_trait]
impl ApprovalRepository for InMemoryStore {
    async fn approvers(&self, document_id: &DocumentId) -> Result<Vec<Approver>, DomainError> {
        let tables = self.tables.lock().await;
        Ok(chain_for(&tables, document_id))
    }

    async fn find_approver(
        &self,
        document_id: &DocumentId,
        approver_id: &ApproverId,
    ) -> Result<Option<Approver>, DomainError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .approvers
            .iter()
            .find(|a| &a.id == approver_id && &a.document_id == document_id)
            .cloned())
    }

    async fn reviewers(&self, document_id: &DocumentId) -> Result<Vec<ExternalReviewer>, DomainError> {
        let tables = self.tables.lock().await;
        Ok(reviewers_for(&tables, document_id))
    }

    async fn find_reviewer_by_token(
        &self,
        token: &ReviewToken,
    ) -> Result<Option<ExternalReviewer>, DomainError> {
        let tables = self.tables.lock().await;
        Ok(tables.reviewers.iter().find(|r| &r.token == token).cloned())
    }
}

#[async_trait]
impl AuditLog for InMemoryStore {
    async fn list_for_document(&self, document_id: &DocumentId) -> Result<Vec<AuditEntry>, DomainError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .audit
            .iter()
            .filter(|e| &e.document_id == document_id)
            .cloned()
            .collect())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .audit
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DeadlineRepository for InMemoryStore {
    async fn get(&self, document_id: &DocumentId) -> Result<Option<Deadline>, DomainError> {
        Ok(self.tables.lock().await.deadlines.get(document_id).cloned())
    }
}

#[async_trait]
impl DocumentSearch for InMemoryStore {
    async fn search(&self, query: &Embedding, limit: u32) -> Result<Vec<SearchHit>, DomainError> {
        let tables = self.tables.lock().await;
        let mut hits: Vec<SearchHit> = tables
            .documents
            .values()
            .filter_map(|stored| {
                stored.embedding.as_ref().map(|embedding| SearchHit {
                    document: stored.document.clone(),
                    similarity: embedding.cosine_similarity(query),
                })
            })
            .collect();
        hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        hits.truncate(limit as usize);
        Ok(hits)
    }
}

pub(super) fn already_resolved(kind: &str) -> DomainError {
    DomainError::new(
        ErrorCode::AlreadyResolved,
        format!("{} has already responded", kind),
    )
}
