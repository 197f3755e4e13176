use std::collections::HashMap;
use std::sync::RwLock;

use rolegate_core::AccountId;
use rolegate_governance::{Account, GovernanceConfig, Role, oldest_admin};

use super::r#trait::{AccountStore, ConfigStore, PersistenceError};

fn poisoned() -> PersistenceError {
    PersistenceError::Storage("lock poisoned".to_string())
}

/// In-memory settings store. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    inner: RwLock<Option<GovernanceConfig>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `config`.
    pub fn with_config(config: GovernanceConfig) -> Self {
        Self {
            inner: RwLock::new(Some(config)),
        }
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load(&self) -> Result<Option<GovernanceConfig>, PersistenceError> {
        let guard = self.inner.read().map_err(|_| poisoned())?;
        Ok(guard.clone())
    }

    fn save(&self, config: &GovernanceConfig) -> Result<(), PersistenceError> {
        let mut guard = self.inner.write().map_err(|_| poisoned())?;
        *guard = Some(config.clone());
        Ok(())
    }

    fn update<F>(&self, change: F) -> Result<GovernanceConfig, PersistenceError>
    where
        F: FnOnce(&mut GovernanceConfig),
    {
        let mut guard = self.inner.write().map_err(|_| poisoned())?;
        let mut config = guard.clone().unwrap_or_default();
        change(&mut config);
        *guard = Some(config.clone());
        Ok(config)
    }
}

/// In-memory account store. Intended for tests/dev.
///
/// Every compare-and-set happens under a single write lock, so concurrent
/// writers to the same account are serialized.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, PersistenceError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(accounts.len())
    }

    pub fn is_empty(&self) -> Result<bool, PersistenceError> {
        Ok(self.len()? == 0)
    }
}

impl AccountStore for InMemoryAccountStore {
    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, PersistenceError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(accounts.get(&id).cloned())
    }

    fn find_oldest_admin(&self) -> Result<Option<Account>, PersistenceError> {
        let admins = self.list_admins()?;
        Ok(oldest_admin(&admins).cloned())
    }

    fn list_admins(&self) -> Result<Vec<Account>, PersistenceError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        let mut admins: Vec<Account> = accounts
            .values()
            .filter(|a| a.role == Role::Admin)
            .cloned()
            .collect();
        admins.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(admins)
    }

    fn save(&self, account: Account) -> Result<(), PersistenceError> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        if let Some(existing) = accounts.get(&account.id) {
            if existing.is_hidden_admin && !account.is_hidden_admin {
                return Err(PersistenceError::Rejected(format!(
                    "hidden flag on account {} cannot be cleared",
                    account.id
                )));
            }
        }
        accounts.insert(account.id, account);
        Ok(())
    }

    fn update_role(
        &self,
        id: AccountId,
        expected: Role,
        new_role: Role,
    ) -> Result<Account, PersistenceError> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| PersistenceError::Conflict(format!("account {id} no longer exists")))?;

        if account.role != expected {
            return Err(PersistenceError::Conflict(format!(
                "account {id}: expected role {expected}, found {}",
                account.role
            )));
        }

        account.role = new_role;
        Ok(account.clone())
    }

    fn delete_if_role(&self, id: AccountId, expected: Role) -> Result<Account, PersistenceError> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        match accounts.get(&id).map(|a| a.role) {
            None => Err(PersistenceError::Conflict(format!("account {id} no longer exists"))),
            Some(found) if found != expected => Err(PersistenceError::Conflict(format!(
                "account {id}: expected role {expected}, found {found}"
            ))),
            Some(_) => accounts
                .remove(&id)
                .ok_or_else(|| PersistenceError::Storage(format!("account {id} vanished"))),
        }
    }
}
