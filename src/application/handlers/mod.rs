//! Command and query handlers.
//!
//! Each handler owns the ports it needs and exposes `handle` (or a few
//! named operations for small query groups).

pub mod approval;
pub mod audit;
pub mod deadline;
pub mod document;
pub mod search;
