use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rolegate_core::AccountId;

use crate::Role;

/// A user account as seen by the policy layer.
///
/// # Invariants
/// - `is_hidden_admin` is one-way: once set it is never cleared here.
/// - `created_at` is immutable; it decides which admin is the implicit hidden one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub role: Role,
    #[serde(default)]
    pub is_hidden_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: AccountId, role: Role, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            role,
            is_hidden_admin: false,
            created_at,
        }
    }

    /// Explicitly protect this account. There is no inverse operation.
    pub fn mark_hidden(&mut self) {
        self.is_hidden_admin = true;
    }

    /// Same account with a different role; the hidden flag is carried over.
    pub fn with_role(&self, role: Role) -> Self {
        Self {
            role,
            ..self.clone()
        }
    }
}
