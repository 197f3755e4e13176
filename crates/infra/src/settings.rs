//! Governance settings accessor.
//!
//! Wraps a [`ConfigStore`] with lazy creation of the default record and the
//! admin gate on every user-facing mutation. The gate is a plain role check;
//! the delegation matrix does not apply here.
//!
//! Every write goes through [`ConfigStore::update`], so the audit worker
//! stamping `last_sync` cannot undo an admin's concurrent mode or
//! kill-switch change.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use rolegate_governance::{GovernanceConfig, GovernanceMode, Role};

use crate::store::{ConfigStore, PersistenceError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("only an admin may change governance settings (caller is '{0}')")]
    NotAdmin(Role),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Clone)]
pub struct GovernanceSettings<C> {
    store: C,
}

impl<C> GovernanceSettings<C>
where
    C: ConfigStore,
{
    pub fn new(store: C) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    /// Current settings; materializes and persists the default on first read.
    pub fn load(&self) -> Result<GovernanceConfig, PersistenceError> {
        if let Some(config) = self.store.load()? {
            return Ok(config);
        }

        // A no-op update keeps whatever a concurrent writer stored first.
        let config = self.store.update(|_| {})?;
        info!(mode = %config.mode, enabled = config.enabled, "governance settings initialized");
        Ok(config)
    }

    pub fn set_mode(
        &self,
        caller: Role,
        mode: GovernanceMode,
    ) -> Result<GovernanceConfig, SettingsError> {
        self.update(caller, |config| config.mode = mode)
    }

    pub fn set_enabled(&self, caller: Role, enabled: bool) -> Result<GovernanceConfig, SettingsError> {
        self.update(caller, |config| config.enabled = enabled)
    }

    pub fn set_sheet_id(
        &self,
        caller: Role,
        sheet_id: Option<String>,
    ) -> Result<GovernanceConfig, SettingsError> {
        self.update(caller, |config| config.sheet_id = sheet_id)
    }

    /// Record a successful external sync. Internal bookkeeping, not admin-gated.
    pub fn record_sync(&self, at: DateTime<Utc>) -> Result<GovernanceConfig, PersistenceError> {
        self.store.update(|config| config.last_sync = Some(at))
    }

    fn update<F>(&self, caller: Role, change: F) -> Result<GovernanceConfig, SettingsError>
    where
        F: FnOnce(&mut GovernanceConfig),
    {
        if !caller.is_admin() {
            return Err(SettingsError::NotAdmin(caller));
        }

        let config = self.store.update(change)?;

        info!(
            mode = %config.mode,
            enabled = config.enabled,
            sheet_id = ?config.sheet_id,
            "governance settings updated"
        );
        Ok(config)
    }
}
