//! Approval-specific error types.

use crate::domain::foundation::{ApproverId, DocumentId, DomainError, ErrorCode, ReviewerId};

/// Errors from approval chain, external review and resolution operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    DocumentNotFound(DocumentId),
    ApproverNotFound(ApproverId),
    ReviewerNotFound(ReviewerId),
    /// No reviewer holds the presented token.
    UnknownToken,
    /// Participant already responded; nothing was written.
    AlreadyResolved(String),
    ValidationFailed { field: String, message: String },
    /// Storage failure; the unit of work was rolled back and may be retried.
    Infrastructure(String),
}

impl ApprovalError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApprovalError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ApprovalError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApprovalError::DocumentNotFound(_) => ErrorCode::DocumentNotFound,
            ApprovalError::ApproverNotFound(_) => ErrorCode::ApproverNotFound,
            ApprovalError::ReviewerNotFound(_) | ApprovalError::UnknownToken => {
                ErrorCode::ReviewerNotFound
            }
            ApprovalError::AlreadyResolved(_) => ErrorCode::AlreadyResolved,
            ApprovalError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ApprovalError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApprovalError::DocumentNotFound(id) => format!("Document not found: {}", id),
            ApprovalError::ApproverNotFound(id) => format!("Approver not found: {}", id),
            ApprovalError::ReviewerNotFound(id) => format!("External reviewer not found: {}", id),
            ApprovalError::UnknownToken => "Invalid or expired token".to_string(),
            ApprovalError::AlreadyResolved(msg) => msg.clone(),
            ApprovalError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ApprovalError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }
}

impl std::fmt::Display for ApprovalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApprovalError {}

impl From<DomainError> for ApprovalError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => ApprovalError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::AlreadyResolved => ApprovalError::AlreadyResolved(err.message),
            ErrorCode::DocumentNotFound => match parse_detail(&err, "document_id") {
                Some(id) => ApprovalError::DocumentNotFound(id),
                None => ApprovalError::Infrastructure(err.message),
            },
            ErrorCode::ApproverNotFound => match parse_detail(&err, "approver_id") {
                Some(id) => ApprovalError::ApproverNotFound(id),
                None => ApprovalError::Infrastructure(err.message),
            },
            ErrorCode::ReviewerNotFound => match parse_detail(&err, "reviewer_id") {
                Some(id) => ApprovalError::ReviewerNotFound(id),
                None => ApprovalError::UnknownToken,
            },
            _ => ApprovalError::Infrastructure(err.to_string()),
        }
    }
}

fn parse_detail<T: std::str::FromStr>(err: &DomainError, key: &str) -> Option<T> {
    err.details.get(key).and_then(|v| v.parse().ok())
}
