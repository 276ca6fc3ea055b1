//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory storage for tests and database-less runs
//! - `postgres` - PostgreSQL + pgvector storage
//! - `embedding` - Embedding service clients
//! - `http` - axum REST API

pub mod embedding;
pub mod http;
pub mod memory;
pub mod postgres;
