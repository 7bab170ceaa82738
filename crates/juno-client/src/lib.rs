//! # juno-client
//!
//! Session layer and typed control surface for the Atlona Juno 451 HDMI matrix.
//!
//! The matrix is controlled through a telnet console that prints literal prompts
//! and answers each command with an echo line and a result line. This crate
//! drives that console:
//!
//! - [`PromptStream`] - read until a literal prompt appears, bounded by a timeout
//! - [`Handshake`] - the username / password / welcome banner login
//! - [`CommandSession`] - connect, log in, run one command, disconnect
//! - [`Juno451`] - power, input status and routing as typed operations
//!
//! Every command uses a fresh, freshly authenticated connection. The console on
//! the device drops idle sessions, and starting from scratch each time keeps
//! commands independent of each other.
//!
//! ## Example
//!
//! ```no_run
//! use juno_client::{Juno451, SessionConfig};
//! use juno_client::protocol::PowerState;
//!
//! let juno = Juno451::new(SessionConfig::new("192.168.1.50", "admin", "Atlona"));
//!
//! if juno.get_power_state()? == PowerState::Off {
//!     juno.set_power_state(PowerState::On)?;
//! }
//! juno.set_source(2)?;
//! println!("inputs: {}", juno.get_input_status()?);
//! # Ok::<(), juno_client::DeviceError>(())
//! ```
//!
//! ## Errors
//!
//! Failures are reported as [`DeviceError`]; [`DeviceError::kind`] groups them
//! into connection failures, protocol mismatches, rejected credentials, timeouts,
//! illegal arguments and transport errors. Nothing is retried.

mod config;
mod device;
mod error;
mod handshake;
mod session;
mod stream;
mod transport;

#[cfg(test)]
mod mock;

pub use juno_protocol as protocol;

pub use config::{
    duration_from_secs, ConfigFile, SessionConfig, DEFAULT_SETTLE_DELAY, DEFAULT_TIMEOUT, MAX_DURATION,
};
pub use device::Juno451;
pub use error::{ConfigError, DeviceError, ErrorKind, Result};
pub use handshake::{Handshake, HandshakeState};
pub use session::CommandSession;
pub use stream::{PromptStream, ReadOutcome};
pub use transport::{Connector, TcpConnector, TcpTransport, Transport};
