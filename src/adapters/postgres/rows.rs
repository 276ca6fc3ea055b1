//! Row types shared by the PostgreSQL adapters.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::approval::{
    Approver, ExternalReviewer, ParticipantStatus, Resolution, ReviewToken,
};
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::document::{Deadline, Document, DocumentStatus, DocumentVersion};
use crate::domain::foundation::{
    Actor, ApproverId, AuditEntryId, DocumentId, DomainError, ErrorCode, ReviewerId, Timestamp,
    VersionId,
};

pub(super) const DOCUMENT_COLUMNS: &str =
    "id, title, content, status, author, created_at, updated_at";

pub(super) const APPROVER_COLUMNS: &str =
    "id, document_id, email, name, step_order, status, comment, resolved_at, created_at";

pub(super) const REVIEWER_COLUMNS: &str =
    "id, document_id, email, name, token, status, comment, resolved_at, created_at";

pub(super) const AUDIT_COLUMNS: &str =
    "id, document_id, action, actor_email, actor_name, details, created_at";

pub(super) fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::database(context, e)
}

/// Map an insert failure, reporting a missing parent document as not found.
pub(super) fn insert_error(err: sqlx::Error, context: &str, document_id: &DocumentId) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            DomainError::document_not_found(document_id)
        }
        _ => DomainError::database(context, err),
    }
}

fn invalid_column(column: &str, reason: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} in database: {}", column, reason),
    )
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct DocumentRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub status: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = DomainError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let status: DocumentStatus = row
            .status
            .parse()
            .map_err(|e| invalid_column("document status", e))?;
        Ok(Document::reconstitute(
            DocumentId::from_uuid(row.id),
            row.title,
            row.content,
            status,
            row.author,
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct VersionRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    pub version_number: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<VersionRow> for DocumentVersion {
    type Error = DomainError;

    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        let version_number =
            u32::try_from(row.version_number).map_err(|e| invalid_column("version_number", e))?;
        Ok(DocumentVersion {
            id: VersionId::from_uuid(row.id),
            document_id: DocumentId::from_uuid(row.document_id),
            content: row.content,
            version_number,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn resolution(
    status: &str,
    comment: Option<String>,
    resolved_at: Option<DateTime<Utc>>,
) -> Result<Resolution, DomainError> {
    let status: ParticipantStatus = status
        .parse()
        .map_err(|e| invalid_column("participant status", e))?;
    Ok(Resolution {
        status,
        comment,
        resolved_at: resolved_at.map(Timestamp::from_datetime),
    })
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ApproverRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub email: String,
    pub name: String,
    pub step_order: i32,
    pub status: String,
    pub comment: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ApproverRow> for Approver {
    type Error = DomainError;

    fn try_from(row: ApproverRow) -> Result<Self, Self::Error> {
        Ok(Approver {
            id: ApproverId::from_uuid(row.id),
            document_id: DocumentId::from_uuid(row.document_id),
            email: row.email,
            name: row.name,
            order: row.step_order,
            resolution: resolution(&row.status, row.comment, row.resolved_at)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ReviewerRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub email: String,
    pub name: String,
    pub token: String,
    pub status: String,
    pub comment: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReviewerRow> for ExternalReviewer {
    type Error = DomainError;

    fn try_from(row: ReviewerRow) -> Result<Self, Self::Error> {
        Ok(ExternalReviewer {
            id: ReviewerId::from_uuid(row.id),
            document_id: DocumentId::from_uuid(row.document_id),
            email: row.email,
            name: row.name,
            token: ReviewToken::parse(&row.token).map_err(|e| invalid_column("token", e))?,
            resolution: resolution(&row.status, row.comment, row.resolved_at)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct AuditRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub action: String,
    pub actor_email: String,
    pub actor_name: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AuditRow> for AuditEntry {
    type Error = DomainError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        let action: AuditAction = row
            .action
            .parse()
            .map_err(|e| invalid_column("audit action", e))?;
        Ok(AuditEntry {
            id: AuditEntryId::from_uuid(row.id),
            document_id: DocumentId::from_uuid(row.document_id),
            action,
            actor: Actor::new(row.actor_email, row.actor_name),
            details: row.details,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct DeadlineRow {
    pub document_id: Uuid,
    pub due_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DeadlineRow> for Deadline {
    fn from(row: DeadlineRow) -> Self {
        Deadline {
            document_id: DocumentId::from_uuid(row.document_id),
            due_at: Timestamp::from_datetime(row.due_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

/// Convert a batch of rows, failing on the first bad one.
pub(super) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, DomainError>
where
    T: TryFrom<R, Error = DomainError>,
{
    rows.into_iter().map(T::try_from).collect()
}
