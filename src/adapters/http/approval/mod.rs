//! HTTP adapter for approval chain, external reviewer and resolution
//! endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AddApproverRequest, AddReviewerRequest, ApproverResponse, ExternalRespondRequest,
    ResolutionResponse, ResolveApproverRequest, ReviewerResponse,
};
pub use handlers::ApprovalHandlers;
pub use routes::approval_routes;
