//! Planner configuration file support.
//!
//! Configuration is read from a TOML file and can be overridden from the
//! environment:
//!
//! ```toml
//! [repository]
//! type = "local"
//!
//! [scheduler]
//! reference_date = "2025-06-09"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! | Variable                 | Overrides                    |
//! |--------------------------|------------------------------|
//! | `PLANNER_CONFIG`         | path of the file to load     |
//! | `REPOSITORY_TYPE`        | `repository.type`            |
//! | `PLANNER_REFERENCE_DATE` | `scheduler.reference_date`   |
//! | `RUST_LOG`               | `logging.level`              |

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::RepositoryType;
use crate::scheduler::{self, ValidationError};

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSettings {
    /// `YYYY-MM-DD`; unset means the built-in default reference date.
    #[serde(default)]
    pub reference_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// A `tracing` level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PlannerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration the way the binary does.
    ///
    /// Reads the file named by `PLANNER_CONFIG` when set, otherwise
    /// `planner.toml` from the current or `backend/` directory when present,
    /// otherwise the defaults. Environment overrides are applied last and the
    /// result is validated.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("PLANNER_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => match Self::default_location() {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn default_location() -> Option<PathBuf> {
        [
            PathBuf::from("planner.toml"),
            PathBuf::from("backend/planner.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Replace settings with any values present in the environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(repo_type) = env::var("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Ok(date) = env::var("PLANNER_REFERENCE_DATE") {
            self.scheduler.reference_date = Some(date);
        }
        if let Ok(level) = env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Check that every setting can be interpreted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.repository_type().map_err(ConfigError::Invalid)?;
        self.reference_date()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// The configured reference date, or the default one.
    pub fn reference_date(&self) -> Result<NaiveDate, ValidationError> {
        scheduler::parse_reference_date(self.scheduler.reference_date.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[repository]
type = "local"

[scheduler]
reference_date = "2025-06-14"

[logging]
level = "debug"
"#;

        let config = PlannerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(
            config.reference_date().unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PlannerConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.reference_date().unwrap(),
            scheduler::default_reference_date()
        );
    }

    #[test]
    fn test_invalid_reference_date_fails_validation() {
        let config =
            PlannerConfig::from_toml_str("[scheduler]\nreference_date = \"June 9th\"\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let err = PlannerConfig::from_toml_str("[repository\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[repository]\ntype = \"memory\"").unwrap();

        let config = PlannerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlannerConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
