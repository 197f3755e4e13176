use std::sync::Arc;

use thiserror::Error;

use rolegate_core::AccountId;
use rolegate_governance::{Account, GovernanceConfig, Role};

/// Storage fault raised by a store collaborator.
///
/// These are **infrastructure errors**. The governance layer never turns
/// them into denials; they propagate to the caller unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The backend failed (lock poisoned, connection lost, ...).
    #[error("storage failure: {0}")]
    Storage(String),

    /// A compare-and-set found different state than the caller decided on.
    #[error("concurrent modification: {0}")]
    Conflict(String),

    /// The write would break a storage invariant.
    #[error("write rejected: {0}")]
    Rejected(String),
}

impl PersistenceError {
    /// Whether re-running the read-decide-write cycle may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, PersistenceError::Conflict(_))
    }
}

/// Persistence for the singleton governance settings record.
pub trait ConfigStore: Send + Sync {
    /// The stored record, or `None` if it was never written.
    fn load(&self) -> Result<Option<GovernanceConfig>, PersistenceError>;

    /// Replace the whole record.
    fn save(&self, config: &GovernanceConfig) -> Result<(), PersistenceError>;

    /// Atomic read-modify-write of the record.
    ///
    /// `change` sees the current record (the default if none was written) and
    /// the result is stored before any other writer can observe or replace
    /// the record in between. Returns the record as stored.
    fn update<F>(&self, change: F) -> Result<GovernanceConfig, PersistenceError>
    where
        F: FnOnce(&mut GovernanceConfig);
}

/// Persistence for user accounts.
///
/// Role writes are compare-and-set so the caller can decide against a
/// snapshot and commit only if that snapshot is still current.
pub trait AccountStore: Send + Sync {
    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, PersistenceError>;

    /// Admin with the earliest `created_at` (smallest id on ties).
    fn find_oldest_admin(&self) -> Result<Option<Account>, PersistenceError>;

    fn list_admins(&self) -> Result<Vec<Account>, PersistenceError>;

    /// Insert or replace an account. Clearing an existing hidden flag is rejected.
    fn save(&self, account: Account) -> Result<(), PersistenceError>;

    /// Set the role of `id` to `new_role` if it currently holds `expected`.
    ///
    /// Fails with [`PersistenceError::Conflict`] if the stored role differs or
    /// the account no longer exists.
    fn update_role(
        &self,
        id: AccountId,
        expected: Role,
        new_role: Role,
    ) -> Result<Account, PersistenceError>;

    /// Remove `id` if it currently holds `expected`; returns the removed account.
    fn delete_if_role(&self, id: AccountId, expected: Role) -> Result<Account, PersistenceError>;
}

impl<S> ConfigStore for Arc<S>
where
    S: ConfigStore + ?Sized,
{
    fn load(&self) -> Result<Option<GovernanceConfig>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, config: &GovernanceConfig) -> Result<(), PersistenceError> {
        (**self).save(config)
    }

    fn update<F>(&self, change: F) -> Result<GovernanceConfig, PersistenceError>
    where
        F: FnOnce(&mut GovernanceConfig),
    {
        (**self).update(change)
    }
}

impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, PersistenceError> {
        (**self).find_by_id(id)
    }

    fn find_oldest_admin(&self) -> Result<Option<Account>, PersistenceError> {
        (**self).find_oldest_admin()
    }

    fn list_admins(&self) -> Result<Vec<Account>, PersistenceError> {
        (**self).list_admins()
    }

    fn save(&self, account: Account) -> Result<(), PersistenceError> {
        (**self).save(account)
    }

    fn update_role(
        &self,
        id: AccountId,
        expected: Role,
        new_role: Role,
    ) -> Result<Account, PersistenceError> {
        (**self).update_role(id, expected, new_role)
    }

    fn delete_if_role(&self, id: AccountId, expected: Role) -> Result<Account, PersistenceError> {
        (**self).delete_if_role(id, expected)
    }
}
