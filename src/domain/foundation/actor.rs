//! Actor identity recorded on audit entries.
//!
//! There are no accounts: callers identify themselves by email and display
//! name, and external reviewers act under the identity stored on their row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Email used when a caller supplies no identity.
pub const UNKNOWN_ACTOR_EMAIL: &str = "unknown";
/// Name used when a caller supplies no identity.
pub const UNKNOWN_ACTOR_NAME: &str = "Unknown";

/// Who performed an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub email: String,
    pub name: String,
}

impl Actor {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// Builds an actor from optional request fields, filling blanks with the
    /// unknown identity.
    pub fn from_parts(email: Option<String>, name: Option<String>) -> Self {
        let email = email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| UNKNOWN_ACTOR_EMAIL.to_string());
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_ACTOR_NAME.to_string());
        Self { email, name }
    }

    /// The identity used for transitions the system performs on its own,
    /// such as a document settling after its last participant responds.
    pub fn system() -> Self {
        Self::new("system", "System")
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ACTOR_EMAIL, UNKNOWN_ACTOR_NAME)
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
