use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::GovernanceMode;

/// Singleton governance settings record.
///
/// Owned by the settings store. Decisions only ever see a snapshot of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Global kill-switch for the delegation system.
    pub enabled: bool,

    pub mode: GovernanceMode,

    /// Identifier of the external sheet that mirrors privilege changes.
    #[serde(default)]
    pub sheet_id: Option<String>,

    /// When the external mirror last acknowledged a change.
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
}

impl GovernanceConfig {
    pub fn with_mode(mut self, mode: GovernanceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: GovernanceMode::Mode1,
            sheet_id: None,
            last_sync: None,
        }
    }
}
