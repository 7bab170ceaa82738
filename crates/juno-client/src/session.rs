//! One command, start to finish.
//!
//! Every command gets its own connection: connect, log in, write the command,
//! skip the echoed line, read the result line, disconnect. Nothing carries over
//! between commands, so an idle-timed-out or desynchronised console session on
//! the device never affects the next call.

use std::io;
use std::time::Duration;

use juno_protocol::{Command, LINE_END};
use tracing::{debug, trace};

use crate::config::SessionConfig;
use crate::error::{DeviceError, Result};
use crate::handshake::Handshake;
use crate::stream::PromptStream;
use crate::transport::{Connector, Transport};

/// Runs single commands against one matrix.
#[derive(Debug)]
pub struct CommandSession<'a, C: Connector> {
    connector: &'a C,
    config: &'a SessionConfig,
}

impl<'a, C: Connector> CommandSession<'a, C> {
    /// Bind a connector to a configuration.
    pub fn new(connector: &'a C, config: &'a SessionConfig) -> Self {
        CommandSession { connector, config }
    }

    /// Execute `command` and return its trimmed result line.
    ///
    /// The connection is closed exactly once before this returns, whether or not
    /// the command succeeded.
    pub fn execute(&self, command: &Command) -> Result<String> {
        let mut stream = Handshake::new(self.config).connect(self.connector)?;
        let result = self.exchange(&mut stream, command);
        stream.close();

        match &result {
            Ok(line) => debug!("Juno451[{}]: {} -> {:?}", self.config.host, command.name(), line),
            Err(e) => debug!("Juno451[{}]: {} failed: {}", self.config.host, command.name(), e),
        }
        result
    }

    fn exchange<T: Transport>(&self, stream: &mut PromptStream<T>, command: &Command) -> Result<String> {
        let timeout = self.config.timeout;

        stream.write_line(&command.to_command_string())?;

        let echo = read_line(stream, timeout)?;
        trace!("Juno451[{}]: echo {:?}", self.config.host, echo);

        let line = read_line(stream, timeout)?;
        Ok(line.trim().to_string())
    }
}

fn read_line<T: Transport>(stream: &mut PromptStream<T>, timeout: Duration) -> Result<String> {
    let outcome = stream.read_until_any(&[LINE_END], timeout)?;
    if outcome.matched.is_none() && outcome.text.is_empty() {
        return Err(DeviceError::ReadFailure(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed before the result line",
        )));
    }
    Ok(outcome.text)
}
