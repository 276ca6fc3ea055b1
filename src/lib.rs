//! Approval CMS - document approval backend.
//!
//! Documents move through draft, pending, approved and rejected. Internal
//! approvers and external reviewers (who respond through a capability
//! token) each resolve once; when every participant has responded the
//! document settles, inside the same transaction as the last decision and
//! its audit entry.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
