//! Atlona Juno 451 Telnet Console Protocol
//!
//! This crate provides types and utilities for talking to the Juno 451 HDMI matrix
//! switch over its telnet control console. The device has no framed API: it prints
//! literal prompts, accepts one text command per line and answers every command with
//! an echo line followed by a result line.
//!
//! # Protocol Overview
//!
//! - **Login** (firmware → host): a greeting containing `Login Please` and the
//!   prompt `Username :`, then `Password :`, then the banner `Welcome to TELNET.`
//! - **Commands** (host → firmware): ASCII text terminated with `\r\n`
//! - **Responses** (firmware → host): the echoed command line, then one result line
//!
//! # Command Types
//!
//! - **Power**: `PWSTA` (query), `PWON`, `PWOFF`
//! - **Inputs**: `InputStatus` - one `0`/`1` digit per HDMI input
//! - **Routing**: `Status` (query), `x{n}AVx1` - route input `n` to the output
//!
//! This crate does no I/O. The session layer that drives a live connection lives in
//! `juno-client`.
//!
//! # Example
//!
//! ```rust
//! use juno_protocol::{Command, PowerState, PromptBuffer, Source};
//!
//! let line = Command::SetSource(Source::new(3)?).encode()?;
//! assert_eq!(line, b"x3AVx1\r\n");
//!
//! let mut buffer = PromptBuffer::new();
//! buffer.push(b"Login Please\r\nUsername :");
//! assert!(buffer.take_through("Username :").is_some());
//!
//! assert_eq!(PowerState::from_response("PWOFF")?, PowerState::Off);
//! # Ok::<(), juno_protocol::ProtocolError>(())
//! ```

mod codec;
mod commands;
mod constants;
mod error;
mod responses;
mod telnet;
mod types;

pub use codec::*;
pub use commands::*;
pub use constants::*;
pub use error::*;
pub use telnet::*;
pub use types::*;
