//! Engine configuration.
//!
//! Read from the process environment, with defaults for anything unset or
//! malformed:
//!
//! - `ROLEGATE_MAX_COMMIT_ATTEMPTS` (default `3`, minimum `1`): how many times a
//!   role change re-runs read-decide-write after a concurrent modification
//! - `ROLEGATE_AUDIT_ENABLED` (default `true`): publish governance events
//!
//! The struct also deserializes, so a host can embed it in its own config file.

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const MAX_COMMIT_ATTEMPTS_VAR: &str = "ROLEGATE_MAX_COMMIT_ATTEMPTS";
pub const AUDIT_ENABLED_VAR: &str = "ROLEGATE_AUDIT_ENABLED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_commit_attempts: u32,
    pub audit_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: 3,
            audit_enabled: true,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_commit_attempts = match lookup(MAX_COMMIT_ATTEMPTS_VAR) {
            None => defaults.max_commit_attempts,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    warn!(var = MAX_COMMIT_ATTEMPTS_VAR, value = %raw, "ignoring invalid value");
                    defaults.max_commit_attempts
                }
            },
        };

        let audit_enabled = match lookup(AUDIT_ENABLED_VAR) {
            None => defaults.audit_enabled,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    warn!(var = AUDIT_ENABLED_VAR, value = %raw, "ignoring invalid value");
                    defaults.audit_enabled
                }
            },
        };

        Self {
            max_commit_attempts,
            audit_enabled,
        }
    }
}
