//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Location
//!
//! Searched in order:
//! 1. `$FACETWORK_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/facetwork/config.toml`
//! 3. `~/.facetwork/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Enumerated values (`unknown_handle`, `mode`, `format`) are checked by
//! serde while parsing. Free-form values are checked by
//! [`FileConfig::validate`] afterwards.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::ConfigError;
use crate::core::store::UnknownHandlePolicy;
use crate::engine::agent::TransactionMode;
use crate::logging::LogFormat;

/// Contents of a configuration file.
///
/// # Example
///
/// ```toml
/// [store]
/// unknown_handle = "empty"
///
/// [agents]
/// mode = "direct"
///
/// [logging]
/// level = "facetwork=debug"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Store defaults
    pub store: Option<StoreSection>,

    /// Agent defaults
    pub agents: Option<AgentsSection>,

    /// Logging settings
    pub logging: Option<LoggingSection>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(logging) = &self.logging {
            logging.validate()?;
        }
        Ok(())
    }
}

/// `[store]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    /// What `facets_of` does with a handle the store has never seen
    pub unknown_handle: Option<UnknownHandlePolicy>,
}

/// `[agents]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AgentsSection {
    /// Mode used by agents built from configuration
    pub mode: Option<TransactionMode>,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Filter directive, e.g. "info" or "facetwork::engine=trace"
    pub level: Option<String>,

    /// Output format
    pub format: Option<LogFormat>,
}

impl LoggingSection {
    /// Validate the logging settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = &self.level {
            if level.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "logging level cannot be empty".to_string(),
                ));
            }
            EnvFilter::try_new(level).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid logging level '{}': {}", level, e))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod file_config {
        use super::*;

        #[test]
        fn defaults() {
            let config = FileConfig::default();
            assert!(config.store.is_none());
            assert!(config.agents.is_none());
            assert!(config.logging.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn parses_every_section() {
            let toml = r#"
                [store]
                unknown_handle = "empty"

                [agents]
                mode = "direct"

                [logging]
                level = "debug"
                format = "json"
            "#;

            let config: FileConfig = toml::from_str(toml).unwrap();

            assert_eq!(
                config.store.unwrap().unknown_handle,
                Some(UnknownHandlePolicy::Empty)
            );
            assert_eq!(config.agents.unwrap().mode, Some(TransactionMode::Direct));
            let logging = config.logging.unwrap();
            assert_eq!(logging.level.as_deref(), Some("debug"));
            assert_eq!(logging.format, Some(LogFormat::Json));
        }

        #[test]
        fn roundtrip() {
            let config = FileConfig {
                store: Some(StoreSection {
                    unknown_handle: Some(UnknownHandlePolicy::Error),
                }),
                agents: Some(AgentsSection {
                    mode: Some(TransactionMode::Transactional),
                }),
                logging: Some(LoggingSection {
                    level: Some("facetwork=trace".to_string()),
                    format: Some(LogFormat::Text),
                }),
            };

            let toml = toml::to_string_pretty(&config).unwrap();
            let parsed: FileConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config, parsed);
        }

        #[test]
        fn reject_unknown_fields() {
            let toml = r#"
                [agents]
                mode = "direct"
                retries = 3
            "#;

            let result: Result<FileConfig, _> = toml::from_str(toml);
            assert!(result.is_err());
        }

        #[test]
        fn reject_unknown_mode() {
            let result: Result<FileConfig, _> = toml::from_str("[agents]\nmode = \"eager\"\n");
            assert!(result.is_err());
        }
    }

    mod logging_section {
        use super::*;

        #[test]
        fn valid_levels() {
            for level in ["info", "warn", "facetwork=debug", "facetwork::engine=trace,info"] {
                let section = LoggingSection {
                    level: Some(level.to_string()),
                    format: None,
                };
                assert!(section.validate().is_ok(), "{level} should be accepted");
            }
        }

        #[test]
        fn empty_level_rejected() {
            let section = LoggingSection {
                level: Some("  ".to_string()),
                format: None,
            };
            assert!(section.validate().is_err());
        }

        #[test]
        fn malformed_level_rejected() {
            let section = LoggingSection {
                level: Some("facetwork=loud".to_string()),
                format: None,
            };
            assert!(section.validate().is_err());
        }
    }
}
