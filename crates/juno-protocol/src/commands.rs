//! Commands that can be sent to the matrix console.

use crate::codec::PromptBuffer;
use crate::constants::*;
use crate::error::ProtocolResult;
use crate::types::{PowerState, Source};

/// Commands accepted by the Juno 451 console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Query the power state (`PWSTA`).
    PowerStatus,

    /// Change the power state (`PWON` / `PWOFF`).
    SetPower(PowerState),

    /// Query signal presence on every input (`InputStatus`).
    InputStatus,

    /// Query the routed input (`Status`).
    Status,

    /// Route an input to the output (`x{n}AVx1`).
    SetSource(Source),

    /// Send a raw command line.
    Raw(String),
}

impl Command {
    /// Encode the command as a line to send to the firmware.
    /// Returns the bytes to send (including the `\r\n` terminator), or
    /// `IllegalArgument` if a raw command is not ASCII.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        PromptBuffer::encode_line(&self.to_command_string())
    }

    /// Get the command string without the terminator.
    pub fn to_command_string(&self) -> String {
        match self {
            Command::PowerStatus => CMD_POWER_STATUS.to_string(),
            Command::SetPower(PowerState::On) => CMD_POWER_ON.to_string(),
            Command::SetPower(PowerState::Off) => CMD_POWER_OFF.to_string(),
            Command::InputStatus => CMD_INPUT_STATUS.to_string(),
            Command::Status => CMD_STATUS.to_string(),
            Command::SetSource(source) => format!("x{}AVx1", source.index()),
            Command::Raw(command) => command.clone(),
        }
    }

    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Command::PowerStatus => CMD_POWER_STATUS,
            Command::SetPower(PowerState::On) => CMD_POWER_ON,
            Command::SetPower(PowerState::Off) => CMD_POWER_OFF,
            Command::InputStatus => CMD_INPUT_STATUS,
            Command::Status => CMD_STATUS,
            Command::SetSource(_) => "xAVx1",
            Command::Raw(_) => "raw",
        }
    }
}
