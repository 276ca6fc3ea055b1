//! PostgreSQL implementation of AuditLog.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{DocumentId, DomainError};
use crate::ports::AuditLog;

use super::rows::{convert_all, db_error, AuditRow, AUDIT_COLUMNS};

#[derive(Clone)]
pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert one entry through any executor. Only document transactions call
/// it, so every entry commits with the mutation it describes.
pub(super) async fn insert_entry<'e, E>(executor: E, entry: &AuditEntry) -> Result<(), DomainError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, document_id, action, actor_email, actor_name, details, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(entry.id.as_uuid())
    .bind(entry.document_id.as_uuid())
    .bind(entry.action.as_str())
    .bind(&entry.actor.email)
    .bind(&entry.actor.name)
    .bind(&entry.details)
    .bind(entry.created_at.as_datetime())
    .execute(executor)
    .await
    .map_err(db_error("Failed to record audit entry"))?;

    Ok(())
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    async fn list_for_document(&self, document_id: &DocumentId) -> Result<Vec<AuditEntry>, DomainError> {
        let sql = format!(
            "SELECT {} FROM audit_logs WHERE document_id = $1 ORDER BY created_at ASC",
            AUDIT_COLUMNS
        );
        let rows: Vec<AuditRow> = sqlx::query_as(&sql)
            .bind(document_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to fetch audit trail"))?;

        convert_all(rows)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError> {
        let sql = format!(
            "SELECT {} FROM audit_logs ORDER BY created_at DESC LIMIT $1",
            AUDIT_COLUMNS
        );
        let rows: Vec<AuditRow> = sqlx::query_as(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to fetch recent audit entries"))?;

        convert_all(rows)
    }
}
