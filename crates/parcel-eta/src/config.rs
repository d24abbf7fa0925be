//! # ETA Configuration
//!
//! Where the rule table lives. Resolved from the environment once at
//! startup and passed to [`RuleStore::from_config`](crate::RuleStore::from_config).

use std::path::{Path, PathBuf};

/// Environment variable naming the rule table file.
pub const RULES_PATH_ENV: &str = "PARCEL_ETA_RULES";

/// Rule table path used when [`RULES_PATH_ENV`] is not set.
pub const DEFAULT_RULES_PATH: &str = "config/eta-logistics-rules.csv";

/// Configuration for the ETA rule store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtaConfig {
    rules_path: PathBuf,
}

impl EtaConfig {
    /// Use an explicit rule table path.
    pub fn new(rules_path: impl Into<PathBuf>) -> Self {
        Self {
            rules_path: rules_path.into(),
        }
    }

    /// Read [`RULES_PATH_ENV`], falling back to [`DEFAULT_RULES_PATH`] when
    /// it is unset or blank.
    pub fn from_env() -> Self {
        match std::env::var(RULES_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::new(path.trim()),
            _ => {
                tracing::debug!(
                    default = DEFAULT_RULES_PATH,
                    "{RULES_PATH_ENV} not set, using default rule table"
                );
                Self::default()
            }
        }
    }

    pub fn rules_path(&self) -> &Path {
        &self.rules_path
    }
}

impl Default for EtaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RULES_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_bundled_table() {
        assert_eq!(
            EtaConfig::default().rules_path(),
            Path::new(DEFAULT_RULES_PATH)
        );
    }

    #[test]
    fn explicit_path_is_kept() {
        let config = EtaConfig::new("/etc/parcel/rules.csv");
        assert_eq!(config.rules_path(), Path::new("/etc/parcel/rules.csv"));
    }
}
