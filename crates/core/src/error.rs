//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// These are decode failures of values entering the policy
/// layer. Denials are *not* errors; they are returned as verdicts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Text that does not name one of the closed set of roles.
    #[error("invalid role: '{0}'")]
    InvalidRole(String),

    /// Text that does not name one of the governance modes.
    #[error("invalid governance mode: '{0}'")]
    InvalidMode(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_role(raw: impl Into<String>) -> Self {
        Self::InvalidRole(raw.into())
    }

    pub fn invalid_mode(raw: impl Into<String>) -> Self {
        Self::InvalidMode(raw.into())
    }
}
