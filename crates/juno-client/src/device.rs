//! Typed control surface for the matrix.

use juno_protocol::{ensure_ascii, Command, InputStatus, PowerState, Source, CMD_STATUS};
use tracing::info;

use crate::config::SessionConfig;
use crate::error::Result;
use crate::session::CommandSession;
use crate::transport::{Connector, TcpConnector};

/// An Atlona Juno 451 HDMI matrix.
///
/// Every method opens its own connection, logs in, runs one command and
/// disconnects; see [`CommandSession`]. Arguments are validated before any
/// connection is attempted.
#[derive(Debug, Clone)]
pub struct Juno451<C: Connector = TcpConnector> {
    config: SessionConfig,
    connector: C,
}

impl Juno451<TcpConnector> {
    /// Control the matrix over TCP.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_connector(config, TcpConnector)
    }
}

impl<C: Connector> Juno451<C> {
    /// Control the matrix through a custom transport.
    pub fn with_connector(config: SessionConfig, connector: C) -> Self {
        Juno451 { config, connector }
    }

    /// Connection settings.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Send a raw console command and return the trimmed result line.
    pub fn command(&self, command: &str) -> Result<String> {
        ensure_ascii("command", command)?;
        self.execute(&Command::Raw(command.to_string()))
    }

    /// Current power state.
    pub fn get_power_state(&self) -> Result<PowerState> {
        let line = self.execute(&Command::PowerStatus)?;
        Ok(PowerState::from_response(&line)?)
    }

    /// Power the matrix on or off. Returns the result line verbatim.
    pub fn set_power_state(&self, state: PowerState) -> Result<String> {
        info!("Juno451[{}]: power {}", self.config.host, state);
        self.execute(&Command::SetPower(state))
    }

    /// Signal presence on every input.
    pub fn get_input_status(&self) -> Result<InputStatus> {
        let line = self.execute(&Command::InputStatus)?;
        Ok(InputStatus::from_response(&line))
    }

    /// The input currently routed to the output.
    pub fn get_source(&self) -> Result<Source> {
        let line = self.execute(&Command::Status)?;
        Ok(Source::from_response(CMD_STATUS, &line)?)
    }

    /// Route input `index` (1 to 4) to the output and return the routed input
    /// the matrix reports back.
    pub fn set_source(&self, index: u8) -> Result<Source> {
        let source = Source::new(index)?;
        info!("Juno451[{}]: routing input {}", self.config.host, source);

        let command = Command::SetSource(source);
        let line = self.execute(&command)?;
        Ok(Source::from_response(command.name(), &line)?)
    }

    fn execute(&self, command: &Command) -> Result<String> {
        CommandSession::new(&self.connector, &self.config).execute(command)
    }
}
