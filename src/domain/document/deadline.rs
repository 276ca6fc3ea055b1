//! Review deadline attached to a document.
//!
//! Deadlines are advisory: passing one flags the document as overdue in
//! views but triggers nothing.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DocumentId, Timestamp};

/// At most one per document; setting a new one replaces the old.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub document_id: DocumentId,
    pub due_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Deadline {
    pub fn new(document_id: DocumentId, due_at: Timestamp) -> Self {
        Self {
            document_id,
            due_at,
            updated_at: Timestamp::now(),
        }
    }

    /// True once `now` is past the due time.
    pub fn is_overdue_at(&self, now: &Timestamp) -> bool {
        now.is_after(&self.due_at)
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(&Timestamp::now())
    }

    /// Audit detail line, e.g. `Deadline set: 2026-03-01`.
    pub fn audit_details(&self) -> String {
        format!("Deadline set: {}", self.due_at.date_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overdue_only_after_due_time() {
        let due = Timestamp::parse("deadline", "2026-03-01T17:00:00Z").unwrap();
        let deadline = Deadline::new(DocumentId::new(), due);

        let before = Timestamp::parse("now", "2026-03-01T16:59:59Z").unwrap();
        let after = Timestamp::parse("now", "2026-03-01T17:00:01Z").unwrap();
        assert!(!deadline.is_overdue_at(&before));
        assert!(!deadline.is_overdue_at(&due));
        assert!(deadline.is_overdue_at(&after));
    }

    #[test]
    fn audit_details_use_calendar_date() {
        let due = Timestamp::parse("deadline", "2026-03-01").unwrap();
        let deadline = Deadline::new(DocumentId::new(), due);
        assert_eq!(deadline.audit_details(), "Deadline set: 2026-03-01");
    }

    #[test]
    fn past_deadline_is_overdue_now() {
        let deadline = Deadline::new(DocumentId::new(), Timestamp::now().minus_days(1));
        assert!(deadline.is_overdue());
    }
}
