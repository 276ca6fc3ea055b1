//! PostgreSQL implementation of DeadlineRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::document::Deadline;
use crate::domain::foundation::{DocumentId, DomainError};
use crate::ports::DeadlineRepository;

use super::rows::{db_error, DeadlineRow};

#[derive(Clone)]
pub struct PostgresDeadlineRepository {
    pool: PgPool,
}

impl PostgresDeadlineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeadlineRepository for PostgresDeadlineRepository {
    async fn get(&self, document_id: &DocumentId) -> Result<Option<Deadline>, DomainError> {
        let row: Option<DeadlineRow> = sqlx::query_as(
            "SELECT document_id, due_at, updated_at FROM document_deadlines WHERE document_id = $1",
        )
        .bind(document_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch deadline"))?;

        Ok(row.map(Deadline::from))
    }
}
