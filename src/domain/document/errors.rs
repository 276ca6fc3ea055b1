//! Document-specific error types.

use crate::domain::foundation::{DocumentId, DomainError, ErrorCode};

/// Errors from document, deadline, audit and search operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Document was not found.
    NotFound(DocumentId),
    /// Operation not allowed in the document's current status.
    InvalidState(String),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error; the caller may retry.
    Infrastructure(String),
}

impl DocumentError {
    pub fn not_found(id: DocumentId) -> Self {
        DocumentError::NotFound(id)
    }
    pub fn invalid_state(message: impl Into<String>) -> Self {
        DocumentError::InvalidState(message.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DocumentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        DocumentError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            DocumentError::NotFound(_) => ErrorCode::DocumentNotFound,
            DocumentError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            DocumentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            DocumentError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            DocumentError::NotFound(id) => format!("Document not found: {}", id),
            DocumentError::InvalidState(msg) => msg.clone(),
            DocumentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            DocumentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for DocumentError {}

impl From<DomainError> for DocumentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => DocumentError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition => DocumentError::InvalidState(err.message),
            ErrorCode::DocumentNotFound => match err.details.get("document_id") {
                Some(id) => id
                    .parse()
                    .map(DocumentError::NotFound)
                    .unwrap_or_else(|_| DocumentError::Infrastructure(err.message.clone())),
                None => DocumentError::Infrastructure(err.message),
            },
            _ => DocumentError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_domain_error_keeps_field() {
        let err: DocumentError = DomainError::validation("title", "too long").into();
        assert_eq!(
            err,
            DocumentError::ValidationFailed {
                field: "title".to_string(),
                message: "too long".to_string()
            }
        );
    }

    #[test]
    fn state_error_keeps_message() {
        let err: DocumentError =
            DomainError::new(ErrorCode::InvalidStateTransition, "Can only approve pending documents")
                .into();
        assert_eq!(err.message(), "Can only approve pending documents");
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn not_found_with_id_detail_maps_to_not_found() {
        let id = DocumentId::new();
        let err: DocumentError = DomainError::new(ErrorCode::DocumentNotFound, "missing")
            .with_detail("document_id", id.to_string())
            .into();
        assert_eq!(err, DocumentError::NotFound(id));
    }

    #[test]
    fn database_error_maps_to_infrastructure() {
        let err: DocumentError = DomainError::database("Failed to fetch", "timeout").into();
        assert!(matches!(err, DocumentError::Infrastructure(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }
}
