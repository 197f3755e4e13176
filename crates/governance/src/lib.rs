//! `rolegate-governance`: pure access-governance policy.
//!
//! Decides whether a role change or account deletion is authorized. This
//! crate does no IO: every decision takes an immutable snapshot of
//! configuration and account state.

pub mod account;
pub mod config;
pub mod decision;
pub mod evaluate;
pub mod events;
pub mod hidden;
pub mod matrix;
pub mod mode;
pub mod role;

pub use account::Account;
pub use config::GovernanceConfig;
pub use decision::{
    AuthorizationRequest, RawRoleChangeRequest, ReasonCode, Verdict, decide_deletion,
    decide_role_change, decide_role_change_raw,
};
pub use evaluate::{PolicySnapshot, evaluate_deletion, evaluate_role_change};
pub use events::{AccountDeleted, GovernanceEvent, RoleChanged};
pub use hidden::{is_hidden, oldest_admin};
pub use matrix::{assignable_roles, can_assign, can_assign_str};
pub use mode::GovernanceMode;
pub use role::Role;
