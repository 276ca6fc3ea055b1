//! Internal approver in a document's approval chain.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ApproverId, Decision, DocumentId, DomainError, Timestamp, ValidationError,
};

use super::{ParticipantStatus, Resolution};

/// Member of the ordered internal approval chain.
///
/// `order` drives display and tie-breaking only; approvers may resolve in
/// any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approver {
    pub id: ApproverId,
    pub document_id: DocumentId,
    pub email: String,
    pub name: String,
    pub order: i32,
    pub resolution: Resolution,
    pub created_at: Timestamp,
}

impl Approver {
    /// # Errors
    ///
    /// - `ValidationFailed` if email or name is blank, or email has no `@`
    pub fn new(
        document_id: DocumentId,
        email: String,
        name: String,
        order: i32,
    ) -> Result<Self, DomainError> {
        let (email, name) = validate_contact(email, name)?;
        Ok(Self {
            id: ApproverId::new(),
            document_id,
            email,
            name,
            order,
            resolution: Resolution::pending(),
            created_at: Timestamp::now(),
        })
    }

    pub fn status(&self) -> ParticipantStatus {
        self.resolution.status
    }

    pub fn resolve(&mut self, decision: Decision, comment: Option<String>) -> Result<(), DomainError> {
        self.resolution.resolve(decision, comment)
    }

    /// Audit detail line for `APPROVER_ADDED`.
    pub fn added_details(&self) -> String {
        format!("Added approver: {} ({})", self.name, self.email)
    }

    pub fn removed_details(&self) -> String {
        format!("Removed approver: {} ({})", self.name, self.email)
    }
}

/// Trim and check the contact fields shared by both participant kinds.
pub(crate) fn validate_contact(email: String, name: String) -> Result<(String, String), DomainError> {
    let email = email.trim().to_string();
    let name = name.trim().to_string();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email").into());
    }
    if !email.contains('@') {
        return Err(ValidationError::invalid_format("email", "expected an address containing '@'").into());
    }
    if name.is_empty() {
        return Err(ValidationError::empty_field("name").into());
    }
    Ok((email, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn new_approver_is_pending_with_trimmed_contact() {
        let approver = Approver::new(
            DocumentId::new(),
            " ana@example.com ".into(),
            " Ana ".into(),
            1,
        )
        .unwrap();
        assert_eq!(approver.email, "ana@example.com");
        assert_eq!(approver.name, "Ana");
        assert_eq!(approver.status(), ParticipantStatus::Pending);
        assert_eq!(approver.resolution.resolved_at, None);
    }

    #[test]
    fn rejects_missing_fields() {
        let doc = DocumentId::new();
        assert!(Approver::new(doc, "".into(), "Ana".into(), 0).is_err());
        assert!(Approver::new(doc, "ana".into(), "Ana".into(), 0).is_err());
        let err = Approver::new(doc, "ana@example.com".into(), " ".into(), 0).unwrap_err();
        assert_eq!(err.details.get("field").map(String::as_str), Some("name"));
    }

    #[test]
    fn resolves_once() {
        let mut approver =
            Approver::new(DocumentId::new(), "b@example.com".into(), "Bo".into(), 2).unwrap();
        approver.resolve(Decision::Approved, None).unwrap();
        assert_eq!(approver.status(), ParticipantStatus::Approved);

        let err = approver.resolve(Decision::Approved, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyResolved);
    }

    #[test]
    fn added_details_name_the_approver() {
        let approver =
            Approver::new(DocumentId::new(), "c@example.com".into(), "Cy".into(), 3).unwrap();
        assert_eq!(approver.added_details(), "Added approver: Cy (c@example.com)");
    }
}
