//! Decoding of result lines.
//!
//! Each command answers with exactly one result line (after the echo). The
//! firmware formats are fixed:
//! - `PWSTA` → `PWON` / `PWOFF`
//! - `InputStatus` → `InputStatus 1010`, one digit per input
//! - `Status` and `x{n}AVx1` → `x{n}AVx1`, the routed input in the second character

use log::debug;

use crate::constants::*;
use crate::error::{ProtocolError, ProtocolResult};
use crate::types::{InputStatus, PowerState, Source};

impl PowerState {
    /// Parse the result of `PWSTA`.
    ///
    /// The line is lowercased and any leading `p`/`w` characters dropped, so both
    /// `PWOFF` and a bare `off` decode.
    pub fn from_response(line: &str) -> ProtocolResult<PowerState> {
        let lowered = line.trim().to_ascii_lowercase();
        let state = lowered.trim_start_matches(['p', 'w']);
        state.parse().map_err(|_| {
            debug!("unrecognised power state line: {:?}", line);
            ProtocolError::InvalidResponse {
                command: CMD_POWER_STATUS,
                response: line.to_string(),
            }
        })
    }
}

impl InputStatus {
    /// Parse the result of `InputStatus`.
    ///
    /// Leading characters of the `InputStatus ` label are dropped; every remaining
    /// character is one input, `'1'` meaning a signal is present.
    pub fn from_response(line: &str) -> InputStatus {
        let flags = line
            .trim()
            .trim_start_matches(|c: char| INPUT_STATUS_LABEL.contains(c))
            .chars()
            .map(|c| c == '1')
            .collect();
        InputStatus::new(flags)
    }
}

impl Source {
    /// Parse the routed input from a `Status` or `x{n}AVx1` result.
    pub fn from_response(command: &'static str, line: &str) -> ProtocolResult<Source> {
        let invalid = || ProtocolError::InvalidResponse {
            command,
            response: line.to_string(),
        };

        let digit = line
            .trim()
            .chars()
            .nth(1)
            .and_then(|c| c.to_digit(10))
            .ok_or_else(invalid)?;

        u8::try_from(digit)
            .ok()
            .and_then(|index| Source::new(index).ok())
            .ok_or_else(invalid)
    }
}
