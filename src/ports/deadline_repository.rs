//! Deadline repository port.
//!
//! Setting and removing deadlines goes through `DocumentTransaction`.

use async_trait::async_trait;

use crate::domain::document::Deadline;
use crate::domain::foundation::{DocumentId, DomainError};

#[async_trait]
pub trait DeadlineRepository: Send + Sync {
    async fn get(&self, document_id: &DocumentId) -> Result<Option<Deadline>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn DeadlineRepository) {}
    }
}
