//! HTTP DTOs for deadline endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::deadline::DeadlineView;
use crate::domain::document::Deadline;
use crate::domain::foundation::Timestamp;

use super::super::common::ActorParams;

/// `deadline` accepts RFC 3339, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetDeadlineRequest {
    #[serde(default)]
    pub deadline: String,
    #[serde(flatten)]
    pub actor: ActorParams,
}

/// A deadline, or `{"deadline": null}` when none is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeadlineResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub deadline: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overdue: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl DeadlineResponse {
    pub fn none() -> Self {
        Self::default()
    }
}

impl From<DeadlineView> for DeadlineResponse {
    fn from(view: DeadlineView) -> Self {
        Self {
            document_id: Some(view.deadline.document_id.to_string()),
            deadline: Some(view.deadline.due_at),
            overdue: Some(view.overdue),
            updated_at: Some(view.deadline.updated_at),
        }
    }
}

impl From<&Deadline> for DeadlineResponse {
    fn from(deadline: &Deadline) -> Self {
        Self {
            document_id: Some(deadline.document_id.to_string()),
            deadline: Some(deadline.due_at),
            overdue: Some(deadline.is_overdue()),
            updated_at: Some(deadline.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_deadline_serializes_as_null() {
        let json = serde_json::to_string(&DeadlineResponse::none()).unwrap();
        assert_eq!(json, r#"{"deadline":null}"#);
    }
}
