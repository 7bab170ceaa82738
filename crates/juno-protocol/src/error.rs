//! Error types for the console protocol.

use thiserror::Error;

/// Errors that can occur when encoding commands or decoding result lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A caller-supplied value is outside what the firmware accepts.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// A result line could not be decoded into the expected value.
    #[error("unexpected response to {command}: {response:?}")]
    InvalidResponse {
        /// The command whose result was being decoded.
        command: &'static str,
        /// The trimmed result line.
        response: String,
    },
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
