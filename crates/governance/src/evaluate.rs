//! Snapshot-level entry points.
//!
//! Callers hand over the actor, the target and a [`PolicySnapshot`]; hidden
//! status is derived here so it is computed exactly once per decision.

use serde::{Deserialize, Serialize};

use crate::decision::{AuthorizationRequest, Verdict, decide_deletion, decide_role_change};
use crate::hidden::is_hidden;
use crate::{Account, GovernanceConfig, Role};

/// Immutable state a decision is made against.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub config: GovernanceConfig,

    /// Every admin account (used to find the implicitly hidden one).
    pub admins: Vec<Account>,
}

impl PolicySnapshot {
    pub fn new(config: GovernanceConfig, admins: Vec<Account>) -> Self {
        Self { config, admins }
    }

    pub fn is_hidden(&self, account: &Account) -> bool {
        is_hidden(account, &self.admins)
    }
}

pub fn evaluate_role_change(
    snapshot: &PolicySnapshot,
    actor: &Account,
    target: &Account,
    requested_role: Role,
) -> Verdict {
    let request = AuthorizationRequest::role_change(actor, target, requested_role);
    decide_role_change(
        &request,
        &snapshot.config,
        snapshot.is_hidden(actor),
        snapshot.is_hidden(target),
    )
}

pub fn evaluate_deletion(snapshot: &PolicySnapshot, actor: &Account, target: &Account) -> Verdict {
    let request = AuthorizationRequest::deletion(actor, target);
    decide_deletion(
        &request,
        actor.id,
        snapshot.is_hidden(target),
        snapshot.is_hidden(actor),
    )
}
