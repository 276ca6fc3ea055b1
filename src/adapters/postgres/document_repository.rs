//! PostgreSQL implementation of DocumentRepository and DocumentSearch.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;

use crate::domain::document::{Document, DocumentStatus, DocumentVersion, Embedding};
use crate::domain::foundation::{DocumentId, DomainError, Timestamp};
use crate::ports::{DocumentRepository, DocumentSearch, DocumentStats, SearchHit};

use super::rows::{convert_all, db_error, DocumentRow, VersionRow, DOCUMENT_COLUMNS};

/// PostgreSQL implementation of the DocumentRepository port.
#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(super) fn to_vector(embedding: &Embedding) -> Vector {
    Vector::from(embedding.as_slice().to_vec())
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn update_fields(&self, document: &Document) -> Result<Document, DomainError> {
        let sql = format!(
            r#"
            UPDATE documents SET
                title = $2,
                content = $3,
                author = $4,
                updated_at = $5
            WHERE id = $1
            RETURNING {}
            "#,
            DOCUMENT_COLUMNS
        );
        let row: Option<DocumentRow> = sqlx::query_as(&sql)
            .bind(document.id().as_uuid())
            .bind(document.title())
            .bind(document.content())
            .bind(document.author())
            .bind(document.updated_at().as_datetime())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to update document"))?;

        row.map(Document::try_from)
            .transpose()?
            .ok_or_else(|| DomainError::document_not_found(document.id()))
    }

    async fn set_embedding(
        &self,
        id: &DocumentId,
        embedding: Option<&Embedding>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE documents SET embedding = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(embedding.map(to_vector))
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to store embedding"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::document_not_found(id));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let sql = format!("SELECT {} FROM documents WHERE id = $1", DOCUMENT_COLUMNS);
        let row: Option<DocumentRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch document"))?;

        row.map(Document::try_from).transpose()
    }

    async fn list(&self, status: Option<DocumentStatus>) -> Result<Vec<Document>, DomainError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM documents
            WHERE $1::text IS NULL OR status = $1
            ORDER BY updated_at DESC
            "#,
            DOCUMENT_COLUMNS
        );
        let rows: Vec<DocumentRow> = sqlx::query_as(&sql)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list documents"))?;

        convert_all(rows)
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError> {
        // Versions, participants and the deadline cascade; audit_logs has no
        // foreign key and keeps its rows.
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete document"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::document_not_found(id));
        }

        Ok(())
    }

    async fn latest_version_number(&self, id: &DocumentId) -> Result<Option<u32>, DomainError> {
        let latest: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(version_number) FROM document_versions WHERE document_id = $1",
        )
        .bind(id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to fetch latest version"))?;

        Ok(latest.and_then(|n| u32::try_from(n).ok()))
    }

    async fn append_version(&self, version: &DocumentVersion) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO document_versions (id, document_id, content, version_number, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(version.id.as_uuid())
        .bind(version.document_id.as_uuid())
        .bind(&version.content)
        .bind(version.version_number as i32)
        .bind(version.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert document version"))?;

        Ok(())
    }

    async fn versions(&self, id: &DocumentId) -> Result<Vec<DocumentVersion>, DomainError> {
        let rows: Vec<VersionRow> = sqlx::query_as(
            r#"
            SELECT id, document_id, content, version_number, created_at
            FROM document_versions
            WHERE document_id = $1
            ORDER BY version_number DESC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch document versions"))?;

        convert_all(rows)
    }

    async fn stats(&self, approved_since: Timestamp) -> Result<DocumentStats, DomainError> {
        let (total, pending, approved, approved_this_week): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'approved'),
                COUNT(*) FILTER (WHERE status = 'approved' AND updated_at > $1)
            FROM documents
            "#,
        )
        .bind(approved_since.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to compute document stats"))?;

        Ok(DocumentStats {
            total: total.max(0) as u64,
            pending: pending.max(0) as u64,
            approved: approved.max(0) as u64,
            approved_this_week: approved_this_week.max(0) as u64,
        })
    }
}

/// pgvector similarity search over `documents.embedding`.
#[derive(Clone)]
pub struct PostgresDocumentSearch {
    pool: PgPool,
}

impl PostgresDocumentSearch {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SearchRow {
    #[sqlx(flatten)]
    document: DocumentRow,
    similarity: f64,
}

#[async_trait]
impl DocumentSearch for PostgresDocumentSearch {
    async fn search(&self, query: &Embedding, limit: u32) -> Result<Vec<SearchHit>, DomainError> {
        let sql = format!(
            r#"
            SELECT {}, (1 - (embedding <=> $1))::float8 AS similarity
            FROM documents
            WHERE embedding IS NOT NULL
            ORDER BY embedding <=> $1
            LIMIT $2
            "#,
            DOCUMENT_COLUMNS
        );
        let rows: Vec<SearchRow> = sqlx::query_as(&sql)
            .bind(to_vector(query))
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to search documents"))?;

        rows.into_iter()
            .map(|row| {
                Ok(SearchHit {
                    document: Document::try_from(row.document)?,
                    similarity: row.similarity,
                })
            })
            .collect()
    }
}
