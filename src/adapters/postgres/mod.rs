//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresDocumentRepository` - Documents, versions and embeddings
//! - `PostgresDocumentSearch` - pgvector similarity search
//! - `PostgresApprovalRepository` - Approval chain and external reviewers
//! - `PostgresDocumentUnitOfWork` - Row-locking document transactions
//! - `PostgresAuditLog` - Append-only audit trail
//! - `PostgresDeadlineRepository` - Review deadlines

mod approval_repository;
mod audit_log;
mod deadline_repository;
mod document_repository;
mod rows;
mod unit_of_work;

pub use approval_repository::PostgresApprovalRepository;
pub use audit_log::PostgresAuditLog;
pub use deadline_repository::PostgresDeadlineRepository;
pub use document_repository::{PostgresDocumentRepository, PostgresDocumentSearch};
pub use unit_of_work::{PostgresDocumentTransaction, PostgresDocumentUnitOfWork};
