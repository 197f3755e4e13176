//! Authorization decisions for role changes and account deletion.
//!
//! - No IO
//! - No panics
//! - Denials are verdicts, not errors
//!
//! Configuration and hidden-admin status arrive pre-resolved, so both
//! decision functions are pure and safe to call from any thread.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rolegate_core::AccountId;

use crate::matrix::can_assign;
use crate::{Account, GovernanceConfig, GovernanceMode, Role};

// ─────────────────────────────────────────────────────────────────────────────
// Verdict
// ─────────────────────────────────────────────────────────────────────────────

/// Machine-readable reason attached to every verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    SystemDisabled,
    ProtectedAccount,
    AssignmentNotPermitted,
    CannotManageCurrentRole,
    CannotModifyAdmin,
    SelfDeleteForbidden,
    Granted,
    Noop,
}

impl ReasonCode {
    /// Stable code, suitable for mapping to a transport status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::SystemDisabled => "SYSTEM_DISABLED",
            ReasonCode::ProtectedAccount => "PROTECTED_ACCOUNT",
            ReasonCode::AssignmentNotPermitted => "ASSIGNMENT_NOT_PERMITTED",
            ReasonCode::CannotManageCurrentRole => "CANNOT_MANAGE_CURRENT_ROLE",
            ReasonCode::CannotModifyAdmin => "CANNOT_MODIFY_ADMIN",
            ReasonCode::SelfDeleteForbidden => "SELF_DELETE_FORBIDDEN",
            ReasonCode::Granted => "GRANTED",
            ReasonCode::Noop => "NOOP",
        }
    }

    /// Human-readable explanation.
    pub fn message(&self) -> &'static str {
        match self {
            ReasonCode::SystemDisabled => "role governance is disabled",
            ReasonCode::ProtectedAccount => "the target account is protected",
            ReasonCode::AssignmentNotPermitted => {
                "the requested role cannot be assigned by this actor in the active mode"
            }
            ReasonCode::CannotManageCurrentRole => {
                "the actor may not manage accounts holding the target's current role"
            }
            ReasonCode::CannotModifyAdmin => "only an admin may modify an admin account",
            ReasonCode::SelfDeleteForbidden => "an account cannot delete itself",
            ReasonCode::Granted => "the change is authorized",
            ReasonCode::Noop => "the account already holds the requested role",
        }
    }

    pub fn is_approval(&self) -> bool {
        matches!(self, ReasonCode::Granted | ReasonCode::Noop)
    }
}

impl core::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allow/deny outcome of a decision call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Verdict {
    pub allowed: bool,
    pub reason: ReasonCode,
}

impl Verdict {
    pub fn allow(reason: ReasonCode) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    pub fn deny(reason: ReasonCode) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }

    /// An approval that requires the caller to persist something.
    pub fn requires_commit(&self) -> bool {
        self.allowed && self.reason == ReasonCode::Granted
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// A privilege-changing request. `requested_role == None` means deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    pub actor_id: AccountId,
    pub actor_role: Role,
    pub target_id: AccountId,
    pub target_current_role: Role,
    pub requested_role: Option<Role>,
}

impl AuthorizationRequest {
    pub fn role_change(actor: &Account, target: &Account, requested_role: Role) -> Self {
        Self {
            actor_id: actor.id,
            actor_role: actor.role,
            target_id: target.id,
            target_current_role: target.role,
            requested_role: Some(requested_role),
        }
    }

    pub fn deletion(actor: &Account, target: &Account) -> Self {
        Self {
            actor_id: actor.id,
            actor_role: actor.role,
            target_id: target.id,
            target_current_role: target.role,
            requested_role: None,
        }
    }

    pub fn is_deletion(&self) -> bool {
        self.requested_role.is_none()
    }

    pub fn is_self_action(&self) -> bool {
        self.actor_id == self.target_id
    }
}

/// A role-change request whose roles are still untrusted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRoleChangeRequest {
    pub actor_id: AccountId,
    pub actor_role: String,
    pub target_id: AccountId,
    pub target_current_role: String,
    pub requested_role: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Decisions
// ─────────────────────────────────────────────────────────────────────────────

/// Role-change inputs after decoding. `None` marks a value that failed to
/// decode; it matches nothing in any matrix.
struct Decoded {
    mode: Option<GovernanceMode>,
    actor_role: Option<Role>,
    current: Option<Role>,
    requested: Option<Role>,
    self_action: bool,
}

fn decide(enabled: bool, d: &Decoded, actor_hidden: bool, target_hidden: bool) -> Verdict {
    if !enabled {
        return Verdict::deny(ReasonCode::SystemDisabled);
    }

    if target_hidden && !d.self_action && !actor_hidden {
        return Verdict::deny(ReasonCode::ProtectedAccount);
    }

    // A hidden actor bypasses the matrix for non-hidden targets, but never
    // for values that failed to decode.
    let hidden_override = actor_hidden && !target_hidden;
    let permits = |candidate: Option<Role>| match (d.mode, d.actor_role, candidate) {
        (Some(mode), Some(acting), Some(candidate)) => {
            hidden_override || can_assign(mode, acting, candidate)
        }
        _ => false,
    };

    if !permits(d.requested) {
        return Verdict::deny(ReasonCode::AssignmentNotPermitted);
    }

    if !permits(d.current) {
        return Verdict::deny(ReasonCode::CannotManageCurrentRole);
    }

    if d.current == Some(Role::Admin) && d.actor_role != Some(Role::Admin) && !actor_hidden {
        return Verdict::deny(ReasonCode::CannotModifyAdmin);
    }

    if d.requested == d.current {
        return Verdict::allow(ReasonCode::Noop);
    }

    Verdict::allow(ReasonCode::Granted)
}

/// Decide whether `request` may change the target's role.
///
/// Checks run in a fixed order and the first denial wins: kill-switch,
/// hidden-account protection, requested-role delegation, current-role
/// management, admin defense-in-depth, then no-op detection.
///
/// A request without a requested role (deletion intent) is denied with
/// `ASSIGNMENT_NOT_PERMITTED`; use [`decide_deletion`] for deletions.
pub fn decide_role_change(
    request: &AuthorizationRequest,
    config: &GovernanceConfig,
    actor_hidden: bool,
    target_hidden: bool,
) -> Verdict {
    let decoded = Decoded {
        mode: Some(config.mode),
        actor_role: Some(request.actor_role),
        current: Some(request.target_current_role),
        requested: request.requested_role,
        self_action: request.is_self_action(),
    };

    let verdict = decide(config.enabled, &decoded, actor_hidden, target_hidden);
    debug!(
        actor_id = %request.actor_id,
        target_id = %request.target_id,
        mode = %config.mode,
        requested = ?request.requested_role,
        reason = %verdict.reason,
        "role change decided"
    );
    verdict
}

/// [`decide_role_change`] over undecoded text.
///
/// Any part that fails to decode (mode, actor role, current role, requested
/// role) resolves to a denial, never to an approval.
pub fn decide_role_change_raw(
    request: &RawRoleChangeRequest,
    enabled: bool,
    mode: &str,
    actor_hidden: bool,
    target_hidden: bool,
) -> Verdict {
    let decoded = Decoded {
        mode: mode.parse().ok(),
        actor_role: request.actor_role.parse().ok(),
        current: request.target_current_role.parse().ok(),
        requested: request.requested_role.parse().ok(),
        self_action: request.actor_id == request.target_id,
    };

    let verdict = decide(enabled, &decoded, actor_hidden, target_hidden);
    debug!(
        actor_id = %request.actor_id,
        target_id = %request.target_id,
        mode,
        requested = %request.requested_role,
        reason = %verdict.reason,
        "raw role change decided"
    );
    verdict
}

/// Decide whether `actor_id` may delete the target of `request`.
///
/// `actor_id` is the authenticated identity; a request whose recorded actor
/// differs from it is still refused when either one is the target.
pub fn decide_deletion(
    request: &AuthorizationRequest,
    actor_id: AccountId,
    target_hidden: bool,
    actor_hidden: bool,
) -> Verdict {
    let verdict = if actor_id == request.target_id || request.is_self_action() {
        Verdict::deny(ReasonCode::SelfDeleteForbidden)
    } else if target_hidden && !actor_hidden {
        Verdict::deny(ReasonCode::ProtectedAccount)
    } else {
        Verdict::allow(ReasonCode::Granted)
    };

    debug!(
        actor_id = %actor_id,
        target_id = %request.target_id,
        reason = %verdict.reason,
        "deletion decided"
    );
    verdict
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
