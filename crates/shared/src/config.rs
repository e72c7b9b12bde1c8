//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::OwnerId;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Snapshot store configuration.
    pub store: StoreConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Savings goal configuration.
    pub goals: GoalsConfig,
    /// Session identity configuration.
    pub session: SessionConfig,
}

/// Snapshot store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON snapshot file.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("nestegg.json")
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "nestegg=info".to_string()
}

/// Savings goal configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalsConfig {
    /// Days before a goal's end date at which a lagging goal is flagged.
    #[serde(default = "default_deadline_warning_days")]
    pub deadline_warning_days: i64,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            deadline_warning_days: default_deadline_warning_days(),
        }
    }
}

fn default_deadline_warning_days() -> i64 {
    7
}

/// Session identity configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Owner whose records are read and written.
    pub owner_id: Option<OwnerId>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("NESTEGG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(["NESTEGG__STORE__PATH", "NESTEGG__LOGGING__FILTER"], || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.store.path, PathBuf::from("nestegg.json"));
            assert_eq!(config.logging.filter, "nestegg=info");
            assert_eq!(config.goals.deadline_warning_days, 7);
            assert!(config.session.owner_id.is_none());
        });
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("NESTEGG__STORE__PATH", Some("/tmp/ledger.json")),
                ("NESTEGG__LOGGING__FILTER", Some("nestegg=debug")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.store.path, PathBuf::from("/tmp/ledger.json"));
                assert_eq!(config.logging.filter, "nestegg=debug");
            },
        );
    }
}
