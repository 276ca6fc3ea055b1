//! Types shared by every HTTP module.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Actor, ErrorCode, ValidationError};

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Pair the body with `status`.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// HTTP status for an error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed
        | ErrorCode::EmptyField
        | ErrorCode::OutOfRange
        | ErrorCode::InvalidFormat
        | ErrorCode::InvalidStateTransition => StatusCode::BAD_REQUEST,
        ErrorCode::DocumentNotFound | ErrorCode::ApproverNotFound | ErrorCode::ReviewerNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorCode::AlreadyResolved => StatusCode::CONFLICT,
        ErrorCode::DatabaseError | ErrorCode::EmbeddingUnavailable => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 400 response for a value that failed to parse.
pub fn validation_response(err: ValidationError) -> Response {
    let field = match &err {
        ValidationError::EmptyField { field }
        | ValidationError::OutOfRange { field, .. }
        | ValidationError::InvalidFormat { field, .. } => field.clone(),
    };
    ErrorResponse::bad_request(err.to_string())
        .with_details(serde_json::json!({ "field": field }))
        .into_response_with(StatusCode::BAD_REQUEST)
}

/// Parse a path segment into a typed ID, or a 400 response.
pub fn parse_id<T: std::str::FromStr>(raw: &str, label: &str) -> Result<T, Response> {
    raw.parse().map_err(|_| {
        ErrorResponse::bad_request(format!("Invalid {} ID", label))
            .into_response_with(StatusCode::BAD_REQUEST)
    })
}

/// Caller identity, from a JSON body or a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorParams {
    #[serde(default, alias = "actorEmail")]
    pub actor_email: Option<String>,
    #[serde(default, alias = "actorName")]
    pub actor_name: Option<String>,
}

impl ActorParams {
    pub fn into_actor(self) -> Actor {
        Actor::from_parts(self.actor_email, self.actor_name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
