//! PostgreSQL implementation of ApprovalRepository (reads only).

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::approval::{Approver, ExternalReviewer, ReviewToken};
use crate::domain::foundation::{ApproverId, DocumentId, DomainError};
use crate::ports::ApprovalRepository;

use super::rows::{convert_all, db_error, ApproverRow, ReviewerRow, APPROVER_COLUMNS, REVIEWER_COLUMNS};

#[derive(Clone)]
pub struct PostgresApprovalRepository {
    pool: PgPool,
}

impl PostgresApprovalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApprovalRepository for PostgresApprovalRepository {
    async fn approvers(&self, document_id: &DocumentId) -> Result<Vec<Approver>, DomainError> {
        let sql = format!(
            "SELECT {} FROM approval_chain WHERE document_id = $1 ORDER BY step_order, created_at",
            APPROVER_COLUMNS
        );
        let rows: Vec<ApproverRow> = sqlx::query_as(&sql)
            .bind(document_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to fetch approval chain"))?;

        convert_all(rows)
    }

    async fn find_approver(
        &self,
        document_id: &DocumentId,
        approver_id: &ApproverId,
    ) -> Result<Option<Approver>, DomainError> {
        let sql = format!(
            "SELECT {} FROM approval_chain WHERE id = $1 AND document_id = $2",
            APPROVER_COLUMNS
        );
        let row: Option<ApproverRow> = sqlx::query_as(&sql)
            .bind(approver_id.as_uuid())
            .bind(document_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch approver"))?;

        row.map(Approver::try_from).transpose()
    }

    async fn reviewers(&self, document_id: &DocumentId) -> Result<Vec<ExternalReviewer>, DomainError> {
        let sql = format!(
            "SELECT {} FROM external_reviewers WHERE document_id = $1 ORDER BY created_at",
            REVIEWER_COLUMNS
        );
        let rows: Vec<ReviewerRow> = sqlx::query_as(&sql)
            .bind(document_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to fetch external reviewers"))?;

        convert_all(rows)
    }

    async fn find_reviewer_by_token(
        &self,
        token: &ReviewToken,
    ) -> Result<Option<ExternalReviewer>, DomainError> {
        let sql = format!("SELECT {} FROM external_reviewers WHERE token = $1", REVIEWER_COLUMNS);
        let row: Option<ReviewerRow> = sqlx::query_as(&sql)
            .bind(token.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch external reviewer"))?;

        row.map(ExternalReviewer::try_from).transpose()
    }
}
