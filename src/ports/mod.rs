//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `DocumentRepository` - Documents, versions, embeddings and stats
//! - `ApprovalRepository` - Approval chain and external reviewers
//! - `DocumentUnitOfWork` - Transactional scope of one audited mutation
//! - `AuditLog` - Append-only audit trail
//! - `DeadlineRepository` - Advisory review deadlines
//!
//! ## Search Ports
//!
//! - `EmbeddingProvider` - Text to vector
//! - `DocumentSearch` - Nearest documents to a vector

mod approval_repository;
mod audit_log;
mod deadline_repository;
mod document_repository;
mod document_search;
mod document_unit_of_work;
mod embedding_provider;

pub use approval_repository::ApprovalRepository;
pub use audit_log::{AuditLog, DEFAULT_AUDIT_LIMIT};
pub use deadline_repository::DeadlineRepository;
pub use document_repository::{DocumentRepository, DocumentStats};
pub use document_search::{DocumentSearch, SearchHit, SEARCH_LIMIT};
pub use document_unit_of_work::{DocumentTransaction, DocumentUnitOfWork};
pub use embedding_provider::{EmbeddingError, EmbeddingProvider};
