//! Migration configuration.

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse migration config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid migration config: {0}")]
    Invalid(String),
}

/// Keys under which the classic app kept its data in the preference store
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyKeys {
    pub user_id: String,
    pub region: String,
    pub bookmark_groups: String,
    pub bookmarks: String,
    pub recent_stops: String,
}

impl Default for LegacyKeys {
    fn default() -> Self {
        Self {
            user_id: "OBAApplicationUserId".into(),
            region: "oBARegion".into(),
            bookmark_groups: "bookmarkGroups".into(),
            bookmarks: "bookmarks".into(),
            recent_stops: "mostRecentStops".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MigrationConfig {
    pub legacy_keys: LegacyKeys,

    /// Deadline for a single stop fetch
    pub fetch_timeout_secs: u64,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            legacy_keys: LegacyKeys::default(),
            fetch_timeout_secs: 30,
        }
    }
}

impl MigrationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetchTimeoutSecs must be greater than zero".into()));
        }

        let keys = [
            &self.legacy_keys.user_id,
            &self.legacy_keys.region,
            &self.legacy_keys.bookmark_groups,
            &self.legacy_keys.bookmarks,
            &self.legacy_keys.recent_stops,
        ];
        if keys.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::Invalid("legacy keys must not be empty".into()));
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
