//! Audit action vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Decision, ValidationError};

/// State-changing action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    DocumentCreated,
    SubmittedForReview,
    ApproverAdded,
    ApproverRemoved,
    ApproverApproved,
    ApproverRejected,
    ExternalReviewerAdded,
    ExternalReviewerRemoved,
    ExternalReviewerApproved,
    ExternalReviewerRejected,
    DeadlineSet,
    DeadlineRemoved,
    DocumentApproved,
    DocumentRejected,
}

impl AuditAction {
    pub const ALL: [AuditAction; 14] = [
        AuditAction::DocumentCreated,
        AuditAction::SubmittedForReview,
        AuditAction::ApproverAdded,
        AuditAction::ApproverRemoved,
        AuditAction::ApproverApproved,
        AuditAction::ApproverRejected,
        AuditAction::ExternalReviewerAdded,
        AuditAction::ExternalReviewerRemoved,
        AuditAction::ExternalReviewerApproved,
        AuditAction::ExternalReviewerRejected,
        AuditAction::DeadlineSet,
        AuditAction::DeadlineRemoved,
        AuditAction::DocumentApproved,
        AuditAction::DocumentRejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::DocumentCreated => "DOCUMENT_CREATED",
            AuditAction::SubmittedForReview => "SUBMITTED_FOR_REVIEW",
            AuditAction::ApproverAdded => "APPROVER_ADDED",
            AuditAction::ApproverRemoved => "APPROVER_REMOVED",
            AuditAction::ApproverApproved => "APPROVER_APPROVED",
            AuditAction::ApproverRejected => "APPROVER_REJECTED",
            AuditAction::ExternalReviewerAdded => "EXTERNAL_REVIEWER_ADDED",
            AuditAction::ExternalReviewerRemoved => "EXTERNAL_REVIEWER_REMOVED",
            AuditAction::ExternalReviewerApproved => "EXTERNAL_REVIEWER_APPROVED",
            AuditAction::ExternalReviewerRejected => "EXTERNAL_REVIEWER_REJECTED",
            AuditAction::DeadlineSet => "DEADLINE_SET",
            AuditAction::DeadlineRemoved => "DEADLINE_REMOVED",
            AuditAction::DocumentApproved => "DOCUMENT_APPROVED",
            AuditAction::DocumentRejected => "DOCUMENT_REJECTED",
        }
    }

    pub fn approver_decision(decision: Decision) -> Self {
        match decision {
            Decision::Approved => AuditAction::ApproverApproved,
            Decision::Rejected => AuditAction::ApproverRejected,
        }
    }

    pub fn reviewer_decision(decision: Decision) -> Self {
        match decision {
            Decision::Approved => AuditAction::ExternalReviewerApproved,
            Decision::Rejected => AuditAction::ExternalReviewerRejected,
        }
    }

    pub fn document_decision(decision: Decision) -> Self {
        match decision {
            Decision::Approved => AuditAction::DocumentApproved,
            Decision::Rejected => AuditAction::DocumentRejected,
        }
    }

    /// Human label: `APPROVER_APPROVED` becomes `Approver Approved`.
    pub fn display_label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditAction::ALL
            .iter()
            .find(|action| action.as_str() == s)
            .copied()
            .ok_or_else(|| ValidationError::invalid_format("action", format!("unknown audit action '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_label_is_title_case() {
        assert_eq!(AuditAction::ApproverApproved.display_label(), "Approver Approved");
        assert_eq!(
            AuditAction::ExternalReviewerRejected.display_label(),
            "External Reviewer Rejected"
        );
        assert_eq!(AuditAction::SubmittedForReview.display_label(), "Submitted For Review");
    }

    #[test]
    fn storage_names_parse_back() {
        for action in AuditAction::ALL {
            assert_eq!(action.as_str().parse::<AuditAction>().unwrap(), action);
        }
        assert!("DOCUMENT_ARCHIVED".parse::<AuditAction>().is_err());
    }

    #[test]
    fn serde_uses_storage_names() {
        assert_eq!(
            serde_json::to_string(&AuditAction::DeadlineSet).unwrap(),
            "\"DEADLINE_SET\""
        );
    }

    #[test]
    fn decision_helpers_pick_matching_action() {
        assert_eq!(
            AuditAction::reviewer_decision(Decision::Rejected),
            AuditAction::ExternalReviewerRejected
        );
        assert_eq!(
            AuditAction::document_decision(Decision::Approved),
            AuditAction::DocumentApproved
        );
    }
}
