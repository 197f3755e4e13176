//! Read-decide-write pipeline for privilege changes.
//!
//! ```text
//! request
//!   ↓
//! 1. Load settings + admins + actor + target (snapshot)
//!   ↓
//! 2. Decide (pure, rolegate-governance)
//!   ↓
//! 3. Commit with compare-and-set on the target's role
//!      └─ conflict → back to 1 (bounded by EngineConfig::max_commit_attempts)
//!   ↓
//! 4. Publish GovernanceEvent (fire-and-forget)
//! ```
//!
//! Denials are returned as `Ok(verdict)`. Only store faults and missing
//! accounts surface as errors.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use rolegate_core::AccountId;
use rolegate_governance::{
    Account, AccountDeleted, GovernanceConfig, GovernanceEvent, GovernanceMode, PolicySnapshot,
    Role, RoleChanged, Verdict, evaluate_deletion, evaluate_role_change,
};

use crate::config::EngineConfig;
use crate::notifier::Notifier;
use crate::settings::{GovernanceSettings, SettingsError};
use crate::store::{AccountStore, ConfigStore, PersistenceError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Accounts and settings read for one decision.
struct Loaded {
    snapshot: PolicySnapshot,
    actor: Account,
    target: Account,
}

pub struct GovernanceService<C, A, N> {
    settings: GovernanceSettings<C>,
    accounts: A,
    notifier: N,
    config: EngineConfig,
}

impl<C, A, N> GovernanceService<C, A, N>
where
    C: ConfigStore,
    A: AccountStore,
    N: Notifier,
{
    pub fn new(config_store: C, accounts: A, notifier: N, config: EngineConfig) -> Self {
        Self {
            settings: GovernanceSettings::new(config_store),
            accounts,
            notifier,
            config,
        }
    }

    pub fn settings(&self) -> &GovernanceSettings<C> {
        &self.settings
    }

    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    /// Current settings and admin list.
    pub fn snapshot(&self) -> Result<PolicySnapshot, ServiceError> {
        let config = self.settings.load()?;
        let admins = self.accounts.list_admins()?;
        Ok(PolicySnapshot::new(config, admins))
    }

    /// Decide without committing anything.
    pub fn evaluate_role_change(
        &self,
        actor_id: AccountId,
        target_id: AccountId,
        requested_role: Role,
    ) -> Result<Verdict, ServiceError> {
        let loaded = self.load(actor_id, target_id)?;
        Ok(evaluate_role_change(
            &loaded.snapshot,
            &loaded.actor,
            &loaded.target,
            requested_role,
        ))
    }

    /// Decide without committing anything.
    pub fn evaluate_deletion(
        &self,
        actor_id: AccountId,
        target_id: AccountId,
    ) -> Result<Verdict, ServiceError> {
        let loaded = self.load(actor_id, target_id)?;
        Ok(evaluate_deletion(&loaded.snapshot, &loaded.actor, &loaded.target))
    }

    /// Decide and, when granted, commit the new role and publish `RoleChanged`.
    pub fn change_role(
        &self,
        actor_id: AccountId,
        target_id: AccountId,
        requested_role: Role,
    ) -> Result<Verdict, ServiceError> {
        let max_attempts = self.config.max_commit_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let loaded = self.load(actor_id, target_id)?;
            let verdict = evaluate_role_change(
                &loaded.snapshot,
                &loaded.actor,
                &loaded.target,
                requested_role,
            );
            if !verdict.requires_commit() {
                return Ok(verdict);
            }

            let previous_role = loaded.target.role;
            match self.accounts.update_role(target_id, previous_role, requested_role) {
                Ok(_) => {
                    info!(
                        actor_id = %actor_id,
                        target_id = %target_id,
                        from = %previous_role,
                        to = %requested_role,
                        mode = %loaded.snapshot.config.mode,
                        "role changed"
                    );
                    self.emit(GovernanceEvent::RoleChanged(RoleChanged {
                        actor_id,
                        target_id,
                        previous_role,
                        new_role: requested_role,
                        occurred_at: Utc::now(),
                    }));
                    return Ok(verdict);
                }
                Err(err) if err.is_conflict() && attempt < max_attempts => {
                    warn!(target_id = %target_id, attempt, error = %err, "role commit conflicted; re-deciding");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Decide and, when granted, remove the account and publish `AccountDeleted`.
    pub fn delete_account(
        &self,
        actor_id: AccountId,
        target_id: AccountId,
    ) -> Result<Verdict, ServiceError> {
        let max_attempts = self.config.max_commit_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let loaded = self.load(actor_id, target_id)?;
            let verdict = evaluate_deletion(&loaded.snapshot, &loaded.actor, &loaded.target);
            if !verdict.requires_commit() {
                return Ok(verdict);
            }

            let role = loaded.target.role;
            match self.accounts.delete_if_role(target_id, role) {
                Ok(_) => {
                    info!(actor_id = %actor_id, target_id = %target_id, role = %role, "account deleted");
                    self.emit(GovernanceEvent::AccountDeleted(AccountDeleted {
                        actor_id,
                        target_id,
                        role,
                        occurred_at: Utc::now(),
                    }));
                    return Ok(verdict);
                }
                Err(err) if err.is_conflict() && attempt < max_attempts => {
                    warn!(target_id = %target_id, attempt, error = %err, "delete conflicted; re-deciding");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Admin-gated; `caller` is the caller's current role.
    pub fn set_mode(
        &self,
        caller: Role,
        mode: GovernanceMode,
    ) -> Result<GovernanceConfig, SettingsError> {
        self.settings.set_mode(caller, mode)
    }

    /// Admin-gated kill-switch.
    pub fn set_enabled(&self, caller: Role, enabled: bool) -> Result<GovernanceConfig, SettingsError> {
        self.settings.set_enabled(caller, enabled)
    }

    fn load(&self, actor_id: AccountId, target_id: AccountId) -> Result<Loaded, ServiceError> {
        let snapshot = self.snapshot()?;
        let actor = self.account(actor_id)?;
        let target = self.account(target_id)?;
        Ok(Loaded {
            snapshot,
            actor,
            target,
        })
    }

    fn account(&self, id: AccountId) -> Result<Account, ServiceError> {
        self.accounts
            .find_by_id(id)?
            .ok_or(ServiceError::AccountNotFound(id))
    }

    fn emit(&self, event: GovernanceEvent) {
        if self.config.audit_enabled {
            self.notifier.publish(event);
        }
    }
}
