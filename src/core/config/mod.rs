//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! A single user-level file supplies defaults for stores, agents and
//! logging. Every setting is optional; a missing file means defaults.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$FACETWORK_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/facetwork/config.toml`
//! 3. `~/.facetwork/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use facetwork::core::config::Config;
//! use facetwork::core::store::DefaultMetadataStore;
//!
//! let config = Config::load().unwrap();
//! let store: DefaultMetadataStore<String> =
//!     DefaultMetadataStore::with_options(config.store_options());
//! println!("agents run {}", config.agent_mode());
//! ```

pub mod schema;

pub use schema::{AgentsSection, FileConfig, LoggingSection, StoreSection};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::store::StoreOptions;
use crate::engine::agent::TransactionMode;
use crate::logging::LogFormat;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FACETWORK_CONFIG";

/// Default logging filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to parse config: {0}")]
    Syntax(String),

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration.
///
/// Accessors apply defaults for anything the file leaves out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Parsed file contents
    pub file: FileConfig,
    /// Path the file was loaded from (if any)
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Load configuration with an explicit environment and home directory.
    ///
    /// `env` is queried for `FACETWORK_CONFIG` and `XDG_CONFIG_HOME`.
    pub fn load_with<F>(env: F, home: Option<PathBuf>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for path in Self::candidates(&env, home) {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Candidate locations, most specific first.
    fn candidates<F>(env: &F, home: Option<PathBuf>) -> Vec<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut paths = Vec::new();

        if let Some(path) = env(CONFIG_ENV).filter(|p| !p.is_empty()) {
            paths.push(PathBuf::from(path));
        }
        if let Some(xdg_home) = env("XDG_CONFIG_HOME").filter(|p| !p.is_empty()) {
            paths.push(PathBuf::from(xdg_home).join("facetwork/config.toml"));
        }
        if let Some(home) = home {
            paths.push(home.join(".facetwork/config.toml"));
        }

        paths
    }

    /// Read, parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        debug!(path = %path.display(), "loaded config");
        Ok(Self {
            file,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(text).map_err(|e| ConfigError::Syntax(e.to_string()))?;
        file.validate()?;

        Ok(Self {
            file,
            loaded_from: None,
        })
    }

    /// Get the canonical path for the config file.
    ///
    /// Returns `~/.facetwork/config.toml`.
    pub fn canonical_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".facetwork/config.toml"))
    }

    /// Write config to the canonical path atomically.
    pub fn write_canonical(config: &FileConfig) -> Result<PathBuf, ConfigError> {
        let path = Self::canonical_path()?;
        Self::write(&path, config)?;
        Ok(path)
    }

    /// Write a config file atomically.
    ///
    /// Validates first, creates parent directories if needed, then writes
    /// to a temp file and renames it over `path`.
    pub fn write(path: &Path, config: &FileConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(path = %path.display(), "wrote config");
        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Options for stores built from this configuration.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            unknown_handle: self
                .file
                .store
                .as_ref()
                .and_then(|s| s.unknown_handle)
                .unwrap_or_default(),
        }
    }

    /// Default agent mode.
    ///
    /// Defaults to transactional.
    pub fn agent_mode(&self) -> TransactionMode {
        self.file
            .agents
            .as_ref()
            .and_then(|a| a.mode)
            .unwrap_or_default()
    }

    /// Logging filter directive.
    ///
    /// Defaults to "info".
    pub fn log_level(&self) -> &str {
        self.file
            .logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Logging output format.
    ///
    /// Defaults to text.
    pub fn log_format(&self) -> LogFormat {
        self.file
            .logging
            .as_ref()
            .and_then(|l| l.format)
            .unwrap_or_default()
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::core::store::UnknownHandlePolicy;
    use tempfile::TempDir;

    fn env_of(vars: &[(&str, &Path)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.display().to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn load_empty_defaults() {
        let temp = TempDir::new().unwrap();

        let config = Config::load_with(no_env, Some(temp.path().to_path_buf())).unwrap();

        assert!(config.loaded_from().is_none());
        assert_eq!(config.store_options(), StoreOptions::default());
        assert_eq!(config.agent_mode(), TransactionMode::Transactional);
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.log_format(), LogFormat::Text);
    }

    #[test]
    fn load_from_env() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("custom.toml");
        fs::write(&config_path, "[agents]\nmode = \"direct\"\n").unwrap();

        let env = env_of(&[(CONFIG_ENV, config_path.as_path())]);
        let config = Config::load_with(env, None).unwrap();

        assert_eq!(config.agent_mode(), TransactionMode::Direct);
        assert_eq!(config.loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    fn env_path_missing_falls_through() {
        let temp = TempDir::new().unwrap();
        let xdg = temp.path().join("xdg");
        fs::create_dir_all(xdg.join("facetwork")).unwrap();
        fs::write(
            xdg.join("facetwork/config.toml"),
            "[store]\nunknown_handle = \"empty\"\n",
        )
        .unwrap();
        let missing = temp.path().join("missing.toml");

        let env = env_of(&[(CONFIG_ENV, missing.as_path()), ("XDG_CONFIG_HOME", xdg.as_path())]);
        let config = Config::load_with(env, None).unwrap();

        assert_eq!(
            config.store_options().unknown_handle,
            UnknownHandlePolicy::Empty
        );
        assert!(config.loaded_from().unwrap().starts_with(&xdg));
    }

    #[test]
    fn load_from_home() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".facetwork")).unwrap();
        fs::write(
            temp.path().join(".facetwork/config.toml"),
            "[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = Config::load_with(no_env, Some(temp.path().to_path_buf())).unwrap();

        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn xdg_wins_over_home() {
        let temp = TempDir::new().unwrap();
        let xdg = temp.path().join("xdg");
        fs::create_dir_all(xdg.join("facetwork")).unwrap();
        fs::write(xdg.join("facetwork/config.toml"), "[agents]\nmode = \"direct\"\n").unwrap();
        fs::create_dir_all(temp.path().join(".facetwork")).unwrap();
        fs::write(
            temp.path().join(".facetwork/config.toml"),
            "[agents]\nmode = \"transactional\"\n",
        )
        .unwrap();

        let env = env_of(&[("XDG_CONFIG_HOME", xdg.as_path())]);
        let config = Config::load_with(env, Some(temp.path().to_path_buf())).unwrap();

        assert_eq!(config.agent_mode(), TransactionMode::Direct);
    }

    #[test]
    fn write_config_atomic() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/config.toml");
        let file = FileConfig {
            logging: Some(LoggingSection {
                level: Some("facetwork=debug".to_string()),
                format: None,
            }),
            ..Default::default()
        };

        Config::write(&path, &file).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());
        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.file, file);
        assert_eq!(loaded.log_level(), "facetwork=debug");
    }

    #[test]
    fn write_rejects_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let file = FileConfig {
            logging: Some(LoggingSection {
                level: Some(String::new()),
                format: None,
            }),
            ..Default::default()
        };

        assert!(matches!(
            Config::write(&path, &file),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn parse_error_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[agents\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();

        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result = Config::from_toml_str("[store]\nunknown_handle = \"error\"\ncapacity = 4\n");
        assert!(matches!(result, Err(ConfigError::Syntax(_))));
    }

    #[test]
    fn invalid_level_rejected() {
        let result = Config::from_toml_str("[logging]\nlevel = \"\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
