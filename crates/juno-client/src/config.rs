//! Connection settings.
//!
//! A [`SessionConfig`] is built once and reused for every command. It can be
//! assembled in code or loaded from YAML:
//!
//! ```yaml
//! host: 192.168.1.50
//! port: 23
//! username: admin
//! password: Atlona
//! timeout_secs: 5
//! settle_delay_secs: 1
//! debug: false
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use juno_protocol::{ensure_ascii, DEFAULT_PORT};
use serde::Deserialize;

use crate::error::ConfigError;

/// Default per-read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default pause after the welcome banner before the first command.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Longest accepted timeout or settle delay.
pub const MAX_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Settings for every connection made to one matrix.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Hostname or IP address of the matrix.
    pub host: String,
    /// Telnet port.
    pub port: u16,
    /// Console username.
    pub username: String,
    /// Console password.
    pub password: String,
    /// Budget for connecting and for each individual read.
    pub timeout: Duration,
    /// Pause after login while the banner finishes printing.
    pub settle_delay: Duration,
    /// Trace every byte on the wire.
    pub debug: bool,
}

impl SessionConfig {
    /// Settings with the default port, timeout and settle delay.
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        SessionConfig {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            password: password.into(),
            timeout: DEFAULT_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            debug: false,
        }
    }

    /// Override the telnet port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the per-read timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the post-login settle delay.
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Enable or disable wire tracing.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check that the settings can be used on the wire.
    ///
    /// The host must be non-empty, the credentials ASCII, the timeout non-zero
    /// and both durations at most [`MAX_DURATION`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        for (name, value) in [("username", &self.username), ("password", &self.password)] {
            ensure_ascii(name, value).map_err(|_| ConfigError::Invalid(format!("{name} must be ASCII")))?;
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".to_string()));
        }
        for (name, value) in [("timeout", self.timeout), ("settle delay", self.settle_delay)] {
            if value > MAX_DURATION {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be at most {}s, got {:?}",
                    MAX_DURATION.as_secs(),
                    value
                )));
            }
        }
        Ok(())
    }

    /// Parse settings from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(yaml)?;
        file.try_into()
    }

    /// Load settings from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("settle_delay", &self.settle_delay)
            .field("debug", &self.debug)
            .finish()
    }
}

/// On-disk layout of a [`SessionConfig`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Hostname or IP address of the matrix.
    pub host: String,
    /// Telnet port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Console username.
    pub username: String,
    /// Console password.
    pub password: String,
    /// Per-read timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
    /// Post-login settle delay in seconds.
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: f64,
    /// Trace every byte on the wire.
    #[serde(default)]
    pub debug: bool,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_secs() -> f64 {
    DEFAULT_TIMEOUT.as_secs_f64()
}

fn default_settle_delay_secs() -> f64 {
    DEFAULT_SETTLE_DELAY.as_secs_f64()
}

/// Convert a number of seconds, rejecting NaN, negatives, zero (unless
/// `allow_zero`) and anything over [`MAX_DURATION`].
pub fn duration_from_secs(name: &str, value: f64, allow_zero: bool) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::Invalid(format!("{name} must be a positive number of seconds, got {value}"));
    if !allow_zero && value == 0.0 {
        return Err(invalid());
    }
    let duration = Duration::try_from_secs_f64(value).map_err(|_| invalid())?;
    if duration > MAX_DURATION {
        return Err(ConfigError::Invalid(format!(
            "{name} must be at most {} seconds, got {value}",
            MAX_DURATION.as_secs()
        )));
    }
    Ok(duration)
}

impl TryFrom<ConfigFile> for SessionConfig {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, ConfigError> {
        let config = SessionConfig {
            timeout: duration_from_secs("timeout_secs", file.timeout_secs, false)?,
            settle_delay: duration_from_secs("settle_delay_secs", file.settle_delay_secs, true)?,
            host: file.host,
            port: file.port,
            username: file.username,
            password: file.password,
            debug: file.debug,
        };
        config.validate()?;
        Ok(config)
    }
}
