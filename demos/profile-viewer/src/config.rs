//! Environment-based configuration for the profile viewer
//!
//! | Variable | Default |
//! |---|---|
//! | `PROFILE_VIEWER_API_URL` | `https://api.github.com` |
//! | `PROFILE_VIEWER_USER_AGENT` | `profile-viewer/<version>` |
//! | `PROFILE_VIEWER_TIMEOUT_SECS` | `10` |
//! | `PROFILE_VIEWER_LOG_LEVEL` | `info` |
//! | `PROFILE_VIEWER_METRICS_ADDR` | unset (metrics disabled) |
//! | `PROFILE_VIEWER_FORMAT` | `text` |
//!
//! # Example
//!
//! ```no_run
//! use profile_viewer::config::ViewerConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ViewerConfig::from_env()?;
//! println!("API: {}", config.api_url);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const ENV_API_URL: &str = "PROFILE_VIEWER_API_URL";
const ENV_USER_AGENT: &str = "PROFILE_VIEWER_USER_AGENT";
const ENV_TIMEOUT_SECS: &str = "PROFILE_VIEWER_TIMEOUT_SECS";
const ENV_LOG_LEVEL: &str = "PROFILE_VIEWER_LOG_LEVEL";
const ENV_METRICS_ADDR: &str = "PROFILE_VIEWER_METRICS_ADDR";
const ENV_FORMAT: &str = "PROFILE_VIEWER_FORMAT";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable could not be parsed
    #[error("Failed to parse {var}: {message}")]
    ParseError {
        /// Variable name
        var: &'static str,
        /// What was wrong with the value
        message: String,
    },
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// How presentations are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text for the terminal
    #[default]
    Text,
    /// HTML fragment
    Html,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown format '{other}', expected text or html")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Html => write!(f, "html"),
        }
    }
}

/// Profile viewer configuration
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Base URL of the GitHub REST API
    pub api_url: String,
    /// `User-Agent` header sent with every request (GitHub rejects requests without one)
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Where to serve Prometheus metrics, if anywhere
    pub metrics_addr: Option<SocketAddr>,
    /// Output format
    pub format: OutputFormat,
}

impl ViewerConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns error if a variable cannot be parsed or validation fails
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns error if a variable cannot be parsed or validation fails
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            api_url: lookup(ENV_API_URL).unwrap_or(defaults.api_url),
            user_agent: lookup(ENV_USER_AGENT).unwrap_or(defaults.user_agent),
            timeout_secs: parse(&lookup, ENV_TIMEOUT_SECS)?.unwrap_or(defaults.timeout_secs),
            log_level: lookup(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            metrics_addr: parse(&lookup, ENV_METRICS_ADDR)?,
            format: parse(&lookup, ENV_FORMAT)?.unwrap_or(defaults.format),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::ValidationError("user_agent cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError("timeout_secs must be > 0".to_string()));
        }
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "invalid log_level: {}. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Default tracing filter derived from the log level
    #[must_use]
    pub fn log_filter(&self) -> String {
        let level = self.log_level.to_lowercase();
        format!("profile_viewer={level},request_lifecycle_runtime={level}")
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            user_agent: format!("profile-viewer/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 10,
            log_level: "info".to_string(),
            metrics_addr: None,
            format: OutputFormat::Text,
        }
    }
}

fn parse<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(var)
        .map(|raw| {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
                var,
                message: e.to_string(),
            })
        })
        .transpose()
}
