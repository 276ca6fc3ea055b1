//! Approval domain module.
//!
//! Internal approvers, external reviewers and the rule combining their
//! decisions into a document outcome.

mod aggregator;
mod approver;
mod errors;
mod participant;
mod reviewer;

pub use aggregator::{aggregate, AggregateOutcome, ParticipantSet};
pub use approver::Approver;
pub use errors::ApprovalError;
pub use participant::{ParticipantStatus, Resolution};
pub use reviewer::{ExternalReviewer, ReviewToken};
