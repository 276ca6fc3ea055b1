//! External reviewer identified by a capability token.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::{
    Decision, DocumentId, DomainError, ReviewerId, Timestamp, ValidationError,
};

use super::approver::validate_contact;
use super::{ParticipantStatus, Resolution};

/// Unguessable bearer string that lets an external reviewer resolve their
/// own pending decision without an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewToken(String);

impl ReviewToken {
    /// 128 random bits as 32 lowercase hex characters.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap a token presented by a caller.
    ///
    /// # Errors
    ///
    /// - `EmptyField` when the token is blank
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::empty_field("token"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reviewer outside the organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReviewer {
    pub id: ReviewerId,
    pub document_id: DocumentId,
    pub email: String,
    pub name: String,
    pub token: ReviewToken,
    pub resolution: Resolution,
    pub created_at: Timestamp,
}

impl ExternalReviewer {
    /// Create a pending reviewer with a freshly issued token.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if email or name is blank, or email has no `@`
    pub fn new(document_id: DocumentId, email: String, name: String) -> Result<Self, DomainError> {
        let (email, name) = validate_contact(email, name)?;
        Ok(Self {
            id: ReviewerId::new(),
            document_id,
            email,
            name,
            token: ReviewToken::generate(),
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

    pub fn added_details(&self) -> String {
        format!("Added external reviewer: {} ({})", self.name, self.email)
    }

    pub fn removed_details(&self) -> String {
        format!("Removed external reviewer: {} ({})", self.name, self.email)
    }
}
