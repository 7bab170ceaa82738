//! Error types for the session layer.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use juno_protocol::ProtocolError;
use thiserror::Error;

/// Coarse classification shared by every [`DeviceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The transport connection could not be established.
    ConnectionFailure,
    /// The peer did not print the expected greeting or prompt.
    ProtocolMismatch,
    /// The username or the password was rejected.
    InvalidCredentials,
    /// A read did not see its pattern in time.
    Timeout,
    /// A caller-supplied value was rejected before any I/O.
    IllegalArgument,
    /// The transport rejected a write.
    WriteFailure,
    /// The transport failed while reading.
    ReadFailure,
    /// A result line could not be decoded.
    InvalidResponse,
}

/// Errors that can occur while talking to the matrix.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Connecting failed, timed out or the name did not resolve.
    #[error("could not connect to {host}:{port}: {source}. Is telnet enabled on the Juno 451?")]
    ConnectionFailure {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// Underlying transport error.
        #[source]
        source: io::Error,
    },

    /// The greeting was missing, so the peer is probably not a Juno 451.
    #[error("'Login Please' prompt not received, is the telnet server definitely an Atlona Juno 451? Received: {received:?}")]
    ProtocolMismatch {
        /// Everything read before giving up.
        received: String,
    },

    /// The username was not accepted.
    #[error("could not complete login process, user {username} is not valid")]
    InvalidUsername {
        /// The rejected username.
        username: String,
    },

    /// The password was not accepted.
    #[error("could not complete login process, password is invalid")]
    InvalidPassword,

    /// The peer stopped responding.
    #[error("timed out after {timeout:?} waiting for {pattern:?}")]
    Timeout {
        /// The pattern that never arrived.
        pattern: String,
        /// The read budget that elapsed.
        timeout: Duration,
    },

    /// Out-of-range power state or source index.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// Write rejected by the transport.
    #[error("write failed: {0}")]
    WriteFailure(#[source] io::Error),

    /// Read failed for a reason other than a timeout.
    #[error("read failed: {0}")]
    ReadFailure(#[source] io::Error),

    /// The result line did not have the expected shape.
    #[error("unexpected response to {command}: {response:?}")]
    InvalidResponse {
        /// Command whose result was being decoded.
        command: &'static str,
        /// The trimmed result line.
        response: String,
    },
}

impl DeviceError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeviceError::ConnectionFailure { .. } => ErrorKind::ConnectionFailure,
            DeviceError::ProtocolMismatch { .. } => ErrorKind::ProtocolMismatch,
            DeviceError::InvalidUsername { .. } | DeviceError::InvalidPassword => {
                ErrorKind::InvalidCredentials
            }
            DeviceError::Timeout { .. } => ErrorKind::Timeout,
            DeviceError::IllegalArgument(_) => ErrorKind::IllegalArgument,
            DeviceError::WriteFailure(_) => ErrorKind::WriteFailure,
            DeviceError::ReadFailure(_) => ErrorKind::ReadFailure,
            DeviceError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
        }
    }
}

impl From<ProtocolError> for DeviceError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::IllegalArgument(message) => DeviceError::IllegalArgument(message),
            ProtocolError::InvalidResponse { command, response } => {
                DeviceError::InvalidResponse { command, response }
            }
        }
    }
}

/// Result type alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Errors loading a [`SessionConfig`](crate::SessionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The YAML did not match the expected layout.
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value was out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}
