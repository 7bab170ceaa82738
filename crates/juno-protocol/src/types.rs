//! Typed values exchanged with the matrix.

use std::fmt;
use std::str::FromStr;

use crate::constants::INPUT_COUNT;
use crate::error::{ProtocolError, ProtocolResult};

/// Power state of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Powered on.
    On,
    /// In standby.
    Off,
}

impl PowerState {
    /// Lowercase name used by the firmware and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::On => "on",
            PowerState::Off => "off",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ProtocolError;

    fn from_str(s: &str) -> ProtocolResult<Self> {
        match s {
            "on" => Ok(PowerState::On),
            "off" => Ok(PowerState::Off),
            other => Err(ProtocolError::IllegalArgument(format!(
                "invalid power state: {other}, should be on or off"
            ))),
        }
    }
}

/// An HDMI input number, always in `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Source(u8);

impl Source {
    /// Validate an input number.
    pub fn new(index: u8) -> ProtocolResult<Self> {
        if (1..=INPUT_COUNT).contains(&index) {
            Ok(Source(index))
        } else {
            Err(ProtocolError::IllegalArgument(format!(
                "source {index} not valid, must be 1, 2, 3 or 4"
            )))
        }
    }

    /// The input number.
    pub fn index(&self) -> u8 {
        self.0
    }

    /// All inputs in ascending order.
    pub fn all() -> impl Iterator<Item = Source> {
        (1..=INPUT_COUNT).map(Source)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Source {
    type Error = ProtocolError;

    fn try_from(index: u8) -> ProtocolResult<Self> {
        Source::new(index)
    }
}

/// Signal presence on each input, in the order the firmware reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputStatus(Vec<bool>);

impl InputStatus {
    /// Wrap per-input flags.
    pub fn new(connected: Vec<bool>) -> Self {
        InputStatus(connected)
    }

    /// Flags in device-reported order; `true` means a signal is present.
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Whether the given input has a signal. Unknown inputs report `false`.
    pub fn is_connected(&self, source: Source) -> bool {
        self.0
            .get(usize::from(source.index()) - 1)
            .copied()
            .unwrap_or(false)
    }

    /// Number of inputs reported.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the firmware reported no inputs at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the raw flags.
    pub fn into_inner(self) -> Vec<bool> {
        self.0
    }
}

impl fmt::Display for InputStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, connected) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", i + 1, if *connected { "connected" } else { "-" })?;
        }
        Ok(())
    }
}
