//! Approval chain, external reviewer and resolution handlers.

mod add_approver;
mod add_reviewer;
mod list_participants;
mod remove_approver;
mod remove_reviewer;
mod resolve_participant;
mod settle;

pub use add_approver::{AddApproverCommand, AddApproverHandler};
pub use add_reviewer::{AddReviewerCommand, AddReviewerHandler};
pub use list_participants::{ListParticipantsHandler, ListParticipantsQuery};
pub use remove_approver::{RemoveApproverCommand, RemoveApproverHandler};
pub use remove_reviewer::{RemoveReviewerCommand, RemoveReviewerHandler};
pub use resolve_participant::{
    ParticipantRef, ResolutionOutcome, ResolveParticipantCommand, ResolveParticipantHandler,
};
