//! DocumentStatus enum for the document workflow lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Decision, StateMachine, ValidationError};

/// Workflow state of a document.
///
/// The single source of truth for where a document sits in review.
/// Users move a document from draft to pending by submitting it; the
/// approved and rejected states are reached by a direct decision on a
/// pending document or by participant aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    /// All statuses in display order.
    pub fn all() -> &'static [DocumentStatus] {
        &[
            DocumentStatus::Draft,
            DocumentStatus::Pending,
            DocumentStatus::Approved,
            DocumentStatus::Rejected,
        ]
    }

    /// Storage and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        }
    }
}

impl StateMachine for DocumentStatus {
    /// Valid transitions:
    /// - Draft -> Pending (submit for review)
    /// - Rejected -> Pending (resubmission)
    /// - Pending -> Approved | Rejected
    fn can_transition_to(&self, target: &Self) -> bool {
        use DocumentStatus::*;
        matches!(
            (self, target),
            (Draft, Pending) | (Rejected, Pending) | (Pending, Approved) | (Pending, Rejected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DocumentStatus::*;
        match self {
            Draft => vec![Pending],
            Pending => vec![Approved, Rejected],
            Rejected => vec![Pending],
            Approved => vec![],
        }
    }

    /// Approved and rejected end a review round even though a rejected
    /// document may be resubmitted.
    fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Approved | DocumentStatus::Rejected)
    }
}

impl From<Decision> for DocumentStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => DocumentStatus::Approved,
            Decision::Rejected => DocumentStatus::Rejected,
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(DocumentStatus::Draft),
            "pending" => Ok(DocumentStatus::Pending),
            "approved" => Ok(DocumentStatus::Approved),
            "rejected" => Ok(DocumentStatus::Rejected),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown document status '{}'", other),
            )),
        }
    }
}
