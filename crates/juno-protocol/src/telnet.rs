//! Telnet option negotiation filter.
//!
//! The console is served by a telnet daemon which may open the connection with
//! `IAC DO/WILL` option requests. The client supports no options: every request
//! is refused (`DO` → `WONT`, `WILL` → `DONT`) and all command sequences are
//! stripped from the data handed to the prompt buffer. An escaped `IAC IAC` is
//! passed through as a literal `0xFF` byte.

/// Interpret As Command.
pub const IAC: u8 = 255;
/// Refuse to let the peer perform an option.
pub const DONT: u8 = 254;
/// Ask the peer to perform an option.
pub const DO: u8 = 253;
/// Refuse to perform an option.
pub const WONT: u8 = 252;
/// Offer to perform an option.
pub const WILL: u8 = 251;
/// Subnegotiation begin.
pub const SB: u8 = 250;
/// Subnegotiation end.
pub const SE: u8 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterState {
    Data,
    Iac,
    Negotiate(u8),
    Subnegotiation,
    SubnegotiationIac,
}

/// Strips telnet command sequences from a byte stream.
///
/// State persists across calls, so a sequence split between two reads is
/// still recognised.
#[derive(Debug)]
pub struct TelnetFilter {
    state: FilterState,
}

impl Default for TelnetFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TelnetFilter {
    /// Create a filter in the plain data state.
    pub fn new() -> Self {
        TelnetFilter {
            state: FilterState::Data,
        }
    }

    /// Filter `input`, appending payload bytes to `data` and refusal replies to
    /// `replies`.
    pub fn feed(&mut self, input: &[u8], data: &mut Vec<u8>, replies: &mut Vec<u8>) {
        for &byte in input {
            self.state = match (self.state, byte) {
                (FilterState::Data, IAC) => FilterState::Iac,
                (FilterState::Data, _) => {
                    data.push(byte);
                    FilterState::Data
                }
                (FilterState::Iac, IAC) => {
                    data.push(IAC);
                    FilterState::Data
                }
                (FilterState::Iac, DO | DONT | WILL | WONT) => FilterState::Negotiate(byte),
                (FilterState::Iac, SB) => FilterState::Subnegotiation,
                // NOP, GA, AYT and friends carry no payload
                (FilterState::Iac, _) => FilterState::Data,
                (FilterState::Negotiate(verb), option) => {
                    match verb {
                        DO => replies.extend_from_slice(&[IAC, WONT, option]),
                        WILL => replies.extend_from_slice(&[IAC, DONT, option]),
                        _ => {}
                    }
                    FilterState::Data
                }
                (FilterState::Subnegotiation, IAC) => FilterState::SubnegotiationIac,
                (FilterState::Subnegotiation, _) => FilterState::Subnegotiation,
                (FilterState::SubnegotiationIac, SE) => FilterState::Data,
                (FilterState::SubnegotiationIac, _) => FilterState::Subnegotiation,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(filter: &mut TelnetFilter, input: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let mut data = Vec::new();
        let mut replies = Vec::new();
        filter.feed(input, &mut data, &mut replies);
        (data, replies)
    }

    #[test]
    fn test_plain_text_passes_through() {
        let mut filter = TelnetFilter::new();
        let (data, replies) = run(&mut filter, b"Login Please\r\n");
        assert_eq!(data, b"Login Please\r\n");
        assert!(replies.is_empty());
    }

    #[test]
    fn test_option_requests_are_refused() {
        let mut filter = TelnetFilter::new();
        let (data, replies) = run(&mut filter, &[IAC, DO, 1, b'A', IAC, WILL, 3, IAC, WONT, 5]);
        assert_eq!(data, b"A");
        assert_eq!(replies, vec![IAC, WONT, 1, IAC, DONT, 3]);
    }

    #[test]
    fn test_sequence_split_across_reads() {
        let mut filter = TelnetFilter::new();
        let (data, replies) = run(&mut filter, &[b'x', IAC]);
        assert_eq!(data, b"x");
        assert!(replies.is_empty());

        let (data, replies) = run(&mut filter, &[DO, 24, b'y']);
        assert_eq!(data, b"y");
        assert_eq!(replies, vec![IAC, WONT, 24]);
    }

    #[test]
    fn test_subnegotiation_and_escaped_iac() {
        let mut filter = TelnetFilter::new();
        let (data, _) = run(&mut filter, &[IAC, SB, 24, 1, IAC, SE, b'a', IAC, IAC, b'b']);
        assert_eq!(data, vec![b'a', IAC, b'b']);
    }
}
