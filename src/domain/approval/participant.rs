//! Status and resolution state shared by approvers and external reviewers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    Decision, DomainError, ErrorCode, StateMachine, Timestamp, ValidationError,
};

/// A participant's response to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Pending => "pending",
            ParticipantStatus::Approved => "approved",
            ParticipantStatus::Rejected => "rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ParticipantStatus::Pending)
    }
}

impl StateMachine for ParticipantStatus {
    /// A participant resolves exactly once: Pending -> Approved | Rejected.
    fn can_transition_to(&self, target: &Self) -> bool {
        use ParticipantStatus::*;
        matches!((self, target), (Pending, Approved) | (Pending, Rejected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ParticipantStatus::*;
        match self {
            Pending => vec![Approved, Rejected],
            Approved | Rejected => vec![],
        }
    }
}

impl From<Decision> for ParticipantStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => ParticipantStatus::Approved,
            Decision::Rejected => ParticipantStatus::Rejected,
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParticipantStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ParticipantStatus::Pending),
            "approved" => Ok(ParticipantStatus::Approved),
            "rejected" => Ok(ParticipantStatus::Rejected),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown participant status '{}'", other),
            )),
        }
    }
}

/// Status, comment and resolution time of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub status: ParticipantStatus,
    pub comment: Option<String>,
    pub resolved_at: Option<Timestamp>,
}

impl Resolution {
    pub fn pending() -> Self {
        Self::default()
    }

    /// Move from pending to the decided status.
    ///
    /// # Errors
    ///
    /// - `AlreadyResolved` when the participant already responded; the
    ///   existing decision is left as it was
    pub fn resolve(&mut self, decision: Decision, comment: Option<String>) -> Result<(), DomainError> {
        self.status = self.status.transition_to(decision.into()).map_err(|_| {
            DomainError::new(
                ErrorCode::AlreadyResolved,
                format!("Participant already responded with '{}'", self.status),
            )
        })?;
        self.comment = comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        self.resolved_at = Some(Timestamp::now());
        Ok(())
    }
}
