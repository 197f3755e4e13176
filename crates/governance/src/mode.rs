use core::str::FromStr;

use serde::{Deserialize, Serialize};

use rolegate_core::DomainError;

/// Named configuration selecting which role-delegation matrix is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GovernanceMode {
    /// Strict top-down: only admins delegate, never to admin.
    #[default]
    #[serde(rename = "mode_1")]
    Mode1,
    /// Sliding window: each tier delegates at or one tier below itself.
    #[serde(rename = "mode_2")]
    Mode2,
    /// Strict hierarchy: each tier delegates strictly below itself.
    #[serde(rename = "mode_3")]
    Mode3,
}

impl GovernanceMode {
    pub const ALL: [GovernanceMode; 3] = [
        GovernanceMode::Mode1,
        GovernanceMode::Mode2,
        GovernanceMode::Mode3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GovernanceMode::Mode1 => "mode_1",
            GovernanceMode::Mode2 => "mode_2",
            GovernanceMode::Mode3 => "mode_3",
        }
    }
}

impl core::fmt::Display for GovernanceMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `mode_1`, `MODE_1` and the bare number `1`.
impl FromStr for GovernanceMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mode_1" | "1" => Ok(GovernanceMode::Mode1),
            "mode_2" | "2" => Ok(GovernanceMode::Mode2),
            "mode_3" | "3" => Ok(GovernanceMode::Mode3),
            _ => Err(DomainError::invalid_mode(s)),
        }
    }
}
