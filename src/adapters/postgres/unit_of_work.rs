//! PostgreSQL document transaction.
//!
//! One database transaction per audited mutation. The document row is
//! locked with `SELECT ... FOR UPDATE` before any participant row, the same
//! order a cascading `DELETE FROM documents` takes. Resolution writes are
//! guarded by `WHERE status = 'pending'` so a duplicate submission that
//! slipped past the read still cannot resolve twice.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::approval::{Approver, ExternalReviewer, ParticipantSet, ReviewToken};
use crate::domain::audit::AuditEntry;
use crate::domain::document::{Deadline, Document, Embedding};
use crate::domain::foundation::{ApproverId, DocumentId, DomainError, ErrorCode, ReviewerId};
use crate::ports::{DocumentTransaction, DocumentUnitOfWork};

use super::audit_log::insert_entry;
use super::document_repository::to_vector;
use super::rows::{
    convert_all, db_error, insert_error, ApproverRow, DocumentRow, ReviewerRow,
    APPROVER_COLUMNS, DOCUMENT_COLUMNS, REVIEWER_COLUMNS,
};

#[derive(Clone)]
pub struct PostgresDocumentUnitOfWork {
    pool: PgPool,
}

impl PostgresDocumentUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentUnitOfWork for PostgresDocumentUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn DocumentTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;
        Ok(Box::new(PostgresDocumentTransaction { tx }))
    }
}

pub struct PostgresDocumentTransaction {
    tx: Transaction<'static, Postgres>,
}

fn already_resolved(kind: &str) -> DomainError {
    DomainError::new(
        ErrorCode::AlreadyResolved,
        format!("{} has already responded", kind),
    )
}

#[async_trait]
impl DocumentTransaction for PostgresDocumentTransaction {
    async fn lock_document(&mut self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let sql = format!("SELECT {} FROM documents WHERE id = $1 FOR UPDATE", DOCUMENT_COLUMNS);
        let row: Option<DocumentRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to lock document"))?;

        row.map(Document::try_from).transpose()
    }

    async fn insert_document(
        &mut self,
        document: &Document,
        embedding: Option<&Embedding>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO documents (
                id, title, content, status, author, embedding, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(document.id().as_uuid())
        .bind(document.title())
        .bind(document.content())
        .bind(document.status().as_str())
        .bind(document.author())
        .bind(embedding.map(to_vector))
        .bind(document.created_at().as_datetime())
        .bind(document.updated_at().as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to insert document"))?;

        Ok(())
    }

    async fn update_document_status(&mut self, document: &Document) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE documents SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(document.id().as_uuid())
            .bind(document.status().as_str())
            .bind(document.updated_at().as_datetime())
            .execute(&mut *self.tx)
            .await
            .map_err(db_error("Failed to update document status"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::document_not_found(document.id()));
        }
        Ok(())
    }

    async fn find_approver(
        &mut self,
        document_id: &DocumentId,
        approver_id: &ApproverId,
    ) -> Result<Option<Approver>, DomainError> {
        let sql = format!(
            "SELECT {} FROM approval_chain WHERE id = $1 AND document_id = $2 FOR UPDATE",
            APPROVER_COLUMNS
        );
        let row: Option<ApproverRow> = sqlx::query_as(&sql)
            .bind(approver_id.as_uuid())
            .bind(document_id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to lock approver"))?;

        row.map(Approver::try_from).transpose()
    }

    async fn find_reviewer_by_token(
        &mut self,
        token: &ReviewToken,
    ) -> Result<Option<ExternalReviewer>, DomainError> {
        // The token names the document, so read it unlocked first and lock
        // the document before the reviewer row.
        let document_id: Option<Uuid> =
            sqlx::query_scalar("SELECT document_id FROM external_reviewers WHERE token = $1")
                .bind(token.as_str())
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(db_error("Failed to fetch external reviewer"))?;
        let Some(document_id) = document_id else {
            return Ok(None);
        };

        sqlx::query("SELECT id FROM documents WHERE id = $1 FOR UPDATE")
            .bind(document_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to lock document"))?;

        // Re-read under the lock; a reviewer removed meanwhile is gone.
        let sql = format!(
            "SELECT {} FROM external_reviewers WHERE token = $1 FOR UPDATE",
            REVIEWER_COLUMNS
        );
        let row: Option<ReviewerRow> = sqlx::query_as(&sql)
            .bind(token.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to lock external reviewer"))?;

        row.map(ExternalReviewer::try_from).transpose()
    }

    async fn insert_approver(&mut self, approver: &Approver) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO approval_chain (
                id, document_id, email, name, step_order, status, comment, resolved_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(approver.id.as_uuid())
        .bind(approver.document_id.as_uuid())
        .bind(&approver.email)
        .bind(&approver.name)
        .bind(approver.order)
        .bind(approver.status().as_str())
        .bind(&approver.resolution.comment)
        .bind(approver.resolution.resolved_at.as_ref().map(|t| *t.as_datetime()))
        .bind(approver.created_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| insert_error(e, "Failed to insert approver", &approver.document_id))?;

        Ok(())
    }

    async fn delete_approver(
        &mut self,
        document_id: &DocumentId,
        approver_id: &ApproverId,
    ) -> Result<Option<Approver>, DomainError> {
        let sql = format!(
            "DELETE FROM approval_chain WHERE id = $1 AND document_id = $2 RETURNING {}",
            APPROVER_COLUMNS
        );
        let row: Option<ApproverRow> = sqlx::query_as(&sql)
            .bind(approver_id.as_uuid())
            .bind(document_id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to delete approver"))?;

        row.map(Approver::try_from).transpose()
    }

    async fn insert_reviewer(&mut self, reviewer: &ExternalReviewer) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO external_reviewers (
                id, document_id, email, name, token, status, comment, resolved_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(reviewer.id.as_uuid())
        .bind(reviewer.document_id.as_uuid())
        .bind(&reviewer.email)
        .bind(&reviewer.name)
        .bind(reviewer.token.as_str())
        .bind(reviewer.status().as_str())
        .bind(&reviewer.resolution.comment)
        .bind(reviewer.resolution.resolved_at.as_ref().map(|t| *t.as_datetime()))
        .bind(reviewer.created_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| insert_error(e, "Failed to insert external reviewer", &reviewer.document_id))?;

        Ok(())
    }

    async fn delete_reviewer(
        &mut self,
        document_id: &DocumentId,
        reviewer_id: &ReviewerId,
    ) -> Result<Option<ExternalReviewer>, DomainError> {
        let sql = format!(
            "DELETE FROM external_reviewers WHERE id = $1 AND document_id = $2 RETURNING {}",
            REVIEWER_COLUMNS
        );
        let row: Option<ReviewerRow> = sqlx::query_as(&sql)
            .bind(reviewer_id.as_uuid())
            .bind(document_id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to delete external reviewer"))?;

        row.map(ExternalReviewer::try_from).transpose()
    }

    async fn save_approver_resolution(&mut self, approver: &Approver) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE approval_chain
            SET status = $2, comment = $3, resolved_at = $4
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(approver.id.as_uuid())
        .bind(approver.status().as_str())
        .bind(&approver.resolution.comment)
        .bind(approver.resolution.resolved_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to update approver"))?;

        if result.rows_affected() == 0 {
            return Err(already_resolved("Approver"));
        }
        Ok(())
    }

    async fn save_reviewer_resolution(
        &mut self,
        reviewer: &ExternalReviewer,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE external_reviewers
            SET status = $2, comment = $3, resolved_at = $4
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(reviewer.id.as_uuid())
        .bind(reviewer.status().as_str())
        .bind(&reviewer.resolution.comment)
        .bind(reviewer.resolution.resolved_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to update external reviewer"))?;

        if result.rows_affected() == 0 {
            return Err(already_resolved("External reviewer"));
        }
        Ok(())
    }

    async fn participants(&mut self, document_id: &DocumentId) -> Result<ParticipantSet, DomainError> {
        let approver_sql = format!(
            "SELECT {} FROM approval_chain WHERE document_id = $1 ORDER BY step_order, created_at",
            APPROVER_COLUMNS
        );
        let approvers: Vec<ApproverRow> = sqlx::query_as(&approver_sql)
            .bind(document_id.as_uuid())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to read approval chain"))?;

        let reviewer_sql = format!(
            "SELECT {} FROM external_reviewers WHERE document_id = $1 ORDER BY created_at",
            REVIEWER_COLUMNS
        );
        let reviewers: Vec<ReviewerRow> = sqlx::query_as(&reviewer_sql)
            .bind(document_id.as_uuid())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to read external reviewers"))?;

        Ok(ParticipantSet::new(convert_all(approvers)?, convert_all(reviewers)?))
    }

    async fn upsert_deadline(&mut self, deadline: &Deadline) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO document_deadlines (document_id, due_at, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (document_id) DO UPDATE SET
                due_at = EXCLUDED.due_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(deadline.document_id.as_uuid())
        .bind(deadline.due_at.as_datetime())
        .bind(deadline.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| insert_error(e, "Failed to upsert deadline", &deadline.document_id))?;

        Ok(())
    }

    async fn delete_deadline(&mut self, document_id: &DocumentId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM document_deadlines WHERE document_id = $1")
            .bind(document_id.as_uuid())
            .execute(&mut *self.tx)
            .await
            .map_err(db_error("Failed to delete deadline"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn append_audit(&mut self, entry: &AuditEntry) -> Result<(), DomainError> {
        insert_entry(&mut *self.tx, entry).await
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(db_error("Failed to commit transaction"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn migrated_pool() -> PgPool {
        let url = std::env::var("APPROVAL_CMS__DATABASE__URL")
            .expect("APPROVAL_CMS__DATABASE__URL must point at a test database");
        let pool = PgPool::connect(&url).await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    #[ignore = "Requires live PostgreSQL"]
    async fn token_lookup_waits_on_the_document_lock_before_the_reviewer_row() {
        let uow = PostgresDocumentUnitOfWork::new(migrated_pool().await);
        let doc = Document::new(DocumentId::new(), "Lock".into(), "Order".into(), None).unwrap();
        let reviewer =
            ExternalReviewer::new(*doc.id(), "rex@partner.example".into(), "Rex".into()).unwrap();
        let mut setup = uow.begin().await.unwrap();
        setup.insert_document(&doc, None).await.unwrap();
        setup.insert_reviewer(&reviewer).await.unwrap();
        setup.commit().await.unwrap();

        // Holds the document lock the way a cascading delete does
        let mut holder = uow.begin().await.unwrap();
        assert!(holder.lock_document(doc.id()).await.unwrap().is_some());

        let token = reviewer.token.clone();
        let other = uow.clone();
        let lookup = tokio::spawn(async move {
            let mut tx = other.begin().await?;
            let found = tx.find_reviewer_by_token(&token).await?;
            tx.commit().await?;
            Ok::<_, DomainError>(found)
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!lookup.is_finished());

        // The reviewer row is still free, so the holder never waits on the lookup
        holder.delete_reviewer(doc.id(), &reviewer.id).await.unwrap();
        holder.commit().await.unwrap();

        assert!(lookup.await.unwrap().unwrap().is_none());
    }
}
