//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `document` - Document aggregate, versions, deadlines and embeddings
//! - `approval` - Approvers, external reviewers and decision aggregation
//! - `audit` - Audit trail vocabulary and entries

pub mod approval;
pub mod audit;
pub mod document;
pub mod foundation;
