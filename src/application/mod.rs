//! Application layer - Commands, Queries, and Handlers.
//!
//! Orchestrates domain operations over the ports. Write handlers take a
//! `XxxCommand`, read handlers a `XxxQuery`.

pub mod handlers;
