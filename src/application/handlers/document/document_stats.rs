//! Dashboard totals.

use std::sync::Arc;

use crate::domain::document::DocumentError;
use crate::domain::foundation::Timestamp;
use crate::ports::{DocumentRepository, DocumentStats};

/// Window for the "approved this week" count.
pub const APPROVED_WINDOW_DAYS: i64 = 7;

pub struct DocumentStatsHandler {
    documents: Arc<dyn DocumentRepository>,
}

impl DocumentStatsHandler {
    pub fn new(documents: Arc<dyn DocumentRepository>) -> Self {
        Self { documents }
    }

    pub async fn handle(&self) -> Result<DocumentStats, DocumentError> {
        let since = Timestamp::now().minus_days(APPROVED_WINDOW_DAYS);
        Ok(self.documents.stats(since).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::document::Document;
    use crate::domain::foundation::{Decision, DocumentId};

    #[tokio::test]
    async fn counts_by_status() {
        let store = Arc::new(InMemoryStore::new());
        let draft = Document::new(DocumentId::new(), "A".into(), "a".into(), None).unwrap();
        let mut pending = Document::new(DocumentId::new(), "B".into(), "b".into(), None).unwrap();
        pending.submit().unwrap();
        let mut approved = Document::new(DocumentId::new(), "C".into(), "c".into(), None).unwrap();
        approved.submit().unwrap();
        approved.decide(Decision::Approved).unwrap();
        for doc in [&draft, &pending, &approved] {
            store.save(doc, None).await.unwrap();
        }

        let stats = DocumentStatsHandler::new(store).handle().await.unwrap();

        assert_eq!(
            stats,
            DocumentStats {
                total: 3,
                pending: 1,
                approved: 1,
                approved_this_week: 1,
            }
        );
    }
}
