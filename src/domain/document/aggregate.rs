//! Document aggregate entity.
//!
//! A document is authored content moving through review. It owns its
//! workflow status; participants and audit entries reference it by ID.

use crate::domain::foundation::{
    Decision, DocumentId, DomainError, ErrorCode, StateMachine, Timestamp, ValidationError,
};
use serde::{Deserialize, Serialize};

use super::DocumentStatus;

/// Maximum length for document title.
pub const MAX_TITLE_LENGTH: usize = 500;

/// Author recorded when the creator gives none.
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// Document aggregate.
///
/// # Invariants
///
/// - `title` is 1-500 characters, non-blank
/// - `content` is non-blank
/// - `status` changes only through `submit`, `decide` or `settle`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    title: String,
    content: String,
    status: DocumentStatus,
    author: String,
    created_at: Timestamp,
    updated_at: Timestamp,
}

/// Partial update of the user-editable fields.
///
/// `None` leaves a field untouched. Status is intentionally absent: it is
/// never directly settable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.author.is_none()
    }
}

/// What an applied patch changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOutcome {
    pub content_changed: bool,
}

impl Document {
    /// Create a new draft document.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title or content is blank, or title is too long
    pub fn new(
        id: DocumentId,
        title: String,
        content: String,
        author: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::validate_title(&title)?;
        Self::validate_content(&content)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            title,
            content,
            status: DocumentStatus::Draft,
            author: normalize_author(author),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a document from persistence (no validation).
    pub fn reconstitute(
        id: DocumentId,
        title: String,
        content: String,
        status: DocumentStatus,
        author: String,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title,
            content,
            status,
            author,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a partial update.
    ///
    /// All fields are validated before any is written, so a rejected patch
    /// leaves the document untouched.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a supplied title or content is invalid
    pub fn apply_patch(&mut self, patch: DocumentPatch) -> Result<PatchOutcome, DomainError> {
        if let Some(title) = &patch.title {
            Self::validate_title(title)?;
        }
        if let Some(content) = &patch.content {
            Self::validate_content(content)?;
        }

        let content_changed = patch
            .content
            .as_ref()
            .is_some_and(|content| content != &self.content);

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(author) = patch.author {
            self.author = normalize_author(Some(author));
        }
        self.updated_at = Timestamp::now();

        Ok(PatchOutcome { content_changed })
    }

    /// Submit a draft, or resubmit a rejected document, for review.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the document is a draft or rejected
    pub fn submit(&mut self) -> Result<(), DomainError> {
        self.transition(DocumentStatus::Pending, "Only draft or rejected documents can be submitted")
    }

    /// Record a direct approve/reject decision on a pending document.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the document is pending
    pub fn decide(&mut self, decision: Decision) -> Result<(), DomainError> {
        let message = match decision {
            Decision::Approved => "Can only approve pending documents",
            Decision::Rejected => "Can only reject pending documents",
        };
        self.transition(decision.into(), message)
    }

    /// Apply the outcome of participant aggregation.
    ///
    /// Returns `true` when the status changed. A document that already
    /// reached a terminal status (for example through a direct decision)
    /// keeps it; a draft whose participants all responded before
    /// submission settles like a pending one.
    pub fn settle(&mut self, outcome: Decision) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = outcome.into();
        self.updated_at = Timestamp::now();
        true
    }

    fn transition(&mut self, target: DocumentStatus, message: &str) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(ErrorCode::InvalidStateTransition, message)
                .with_detail("current_status", self.status.as_str())
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    fn validate_title(title: &str) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title").into());
        }
        let length = title.chars().count();
        if length > MAX_TITLE_LENGTH {
            return Err(ValidationError::out_of_range(
                "title",
                1,
                MAX_TITLE_LENGTH as i32,
                length.min(i32::MAX as usize) as i32,
            )
            .into());
        }
        Ok(())
    }

    fn validate_content(content: &str) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(ValidationError::empty_field("content").into());
        }
        Ok(())
    }
}

fn normalize_author(author: Option<String>) -> String {
    author
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string())
}
