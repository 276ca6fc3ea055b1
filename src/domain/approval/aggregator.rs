//! Combine participant decisions into one document outcome.
//!
//! Internal approvers and external reviewers form a single pool. The pool
//! settles only once nobody is pending: unanimous approval approves, any
//! rejection rejects. A lone early rejection therefore waits for the rest.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Decision;

use super::{Approver, ExternalReviewer, ParticipantStatus};

/// Result of evaluating a participant pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateOutcome {
    /// Empty pool or someone still pending; the document is left alone.
    Undecided,
    Approved,
    Rejected,
}

impl AggregateOutcome {
    pub fn decision(&self) -> Option<Decision> {
        match self {
            AggregateOutcome::Undecided => None,
            AggregateOutcome::Approved => Some(Decision::Approved),
            AggregateOutcome::Rejected => Some(Decision::Rejected),
        }
    }
}

/// Evaluate a pool of participant statuses.
pub fn aggregate<I>(statuses: I) -> AggregateOutcome
where
    I: IntoIterator<Item = ParticipantStatus>,
{
    let mut seen_any = false;
    let mut any_rejected = false;
    for status in statuses {
        seen_any = true;
        match status {
            ParticipantStatus::Pending => return AggregateOutcome::Undecided,
            ParticipantStatus::Rejected => any_rejected = true,
            ParticipantStatus::Approved => {}
        }
    }

    match (seen_any, any_rejected) {
        (false, _) => AggregateOutcome::Undecided,
        (true, true) => AggregateOutcome::Rejected,
        (true, false) => AggregateOutcome::Approved,
    }
}

/// Every participant of one document, as re-read inside a resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParticipantSet {
    pub approvers: Vec<Approver>,
    pub reviewers: Vec<ExternalReviewer>,
}

impl ParticipantSet {
    pub fn new(approvers: Vec<Approver>, reviewers: Vec<ExternalReviewer>) -> Self {
        Self { approvers, reviewers }
    }

    pub fn len(&self) -> usize {
        self.approvers.len() + self.reviewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_count(&self) -> usize {
        self.statuses().filter(ParticipantStatus::is_pending).count()
    }

    pub fn statuses(&self) -> impl Iterator<Item = ParticipantStatus> + '_ {
        self.approvers
            .iter()
            .map(Approver::status)
            .chain(self.reviewers.iter().map(ExternalReviewer::status))
    }

    pub fn outcome(&self) -> AggregateOutcome {
        aggregate(self.statuses())
    }
}
