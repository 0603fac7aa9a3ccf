//! logging
//!
//! Structured logging set-up using `tracing`.
//!
//! The library itself only emits events; nothing is printed until an
//! application installs a subscriber. [`init_logging`] installs a
//! `tracing-subscriber` fmt subscriber writing to stderr, as text or JSON.
//!
//! # Filter precedence
//!
//! 1. `FACETWORK_LOG` environment variable
//! 2. The configured level
//! 3. `info`

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{fmt as layer_fmt, layer::SubscriberExt, util::SubscriberInitExt};
use tracing_subscriber::{EnvFilter, Registry};

use crate::core::config::{Config, DEFAULT_LOG_LEVEL};

/// Environment variable overriding the configured filter.
pub const LOG_ENV: &str = "FACETWORK_LOG";

/// Errors from logging set-up.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    /// A global subscriber is already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Filter directive used when `FACETWORK_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingSettings {
    /// Settings taken from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            level: config.log_level().to_string(),
            format: config.log_format(),
        }
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// - [`LoggingError::InvalidFilter`] if the effective directive is malformed
/// - [`LoggingError::AlreadyInitialized`] if a subscriber is already set
pub fn init_logging(settings: &LoggingSettings) -> Result<(), LoggingError> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_env_filter(env.as_deref(), &settings.level)?;
    let base_subscriber = Registry::default().with(filter);

    let installed = match settings.format {
        LogFormat::Json => base_subscriber
            .with(
                layer_fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => base_subscriber
            .with(
                layer_fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    installed.map_err(|_| LoggingError::AlreadyInitialized)
}

/// Build the filter, preferring a non-empty environment directive.
fn build_env_filter(env: Option<&str>, level: &str) -> Result<EnvFilter, LoggingError> {
    let directive = env
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(level);

    EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidFilter {
        directive: directive.to_string(),
        message: e.to_string(),
    })
}
