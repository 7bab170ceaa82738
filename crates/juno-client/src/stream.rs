//! Line-oriented prompt I/O over a [`Transport`].

use std::io;
use std::time::{Duration, Instant};

use juno_protocol::PromptBuffer;
use tracing::{debug, trace};

use crate::error::{DeviceError, Result};
use crate::transport::{Connector, Transport};

/// Bytes requested from the transport per read.
const READ_CHUNK: usize = 512;

/// Result of [`PromptStream::read_until_any`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Everything read, through the matched pattern if there was one.
    pub text: String,
    /// Index of the matched pattern, or `None` if the peer closed the stream first.
    pub matched: Option<usize>,
}

/// Reads a connection until literal prompts appear.
///
/// Owns its transport. The transport is closed by [`close`](Self::close) or on
/// drop, whichever comes first; later calls are no-ops.
pub struct PromptStream<T: Transport> {
    transport: Option<T>,
    buffer: PromptBuffer,
    trace_io: bool,
}

impl<T: Transport> PromptStream<T> {
    /// Wrap an already open transport.
    ///
    /// With `trace_io` set every byte read and written is logged at trace level.
    pub fn new(transport: T, trace_io: bool) -> Self {
        PromptStream {
            transport: Some(transport),
            buffer: PromptBuffer::new(),
            trace_io,
        }
    }

    /// Connect through `connector`.
    pub fn open<C>(connector: &C, host: &str, port: u16, timeout: Duration, trace_io: bool) -> Result<Self>
    where
        C: Connector<Transport = T>,
    {
        debug!("PromptStream[{}:{}]: connecting", host, port);
        let transport = connector
            .connect(host, port, timeout)
            .map_err(|source| DeviceError::ConnectionFailure {
                host: host.to_string(),
                port,
                source,
            })?;
        Ok(Self::new(transport, trace_io))
    }

    /// Read until `pattern` appears, giving up after `timeout`.
    ///
    /// Returns the text through the pattern. If the peer closes the stream first,
    /// whatever arrived is returned unmatched and the caller decides what it means.
    pub fn read_until(&mut self, pattern: &str, timeout: Duration) -> Result<String> {
        self.read_until_any(&[pattern], timeout).map(|outcome| outcome.text)
    }

    /// Read until the earliest match of any of `patterns`, giving up after `timeout`.
    pub fn read_until_any(&mut self, patterns: &[&str], timeout: Duration) -> Result<ReadOutcome> {
        let deadline = deadline_after(timeout)?;
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            if let Some(found) = self.buffer.take_through_any(patterns) {
                return Ok(ReadOutcome {
                    text: found.text,
                    matched: Some(found.pattern_index),
                });
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!(
                    "PromptStream: no {:?} after {:?}, buffered {:?}",
                    patterns,
                    timeout,
                    self.buffer.buffer_as_str()
                );
                return Err(DeviceError::Timeout {
                    pattern: patterns.join(" | "),
                    timeout,
                });
            }

            let transport = self
                .transport
                .as_mut()
                .ok_or_else(|| DeviceError::ReadFailure(closed_error()))?;

            match transport.read_available(&mut chunk, remaining) {
                Ok(0) => {
                    let text = self.buffer.take_all();
                    debug!("PromptStream: peer closed the stream, unmatched {:?}", text);
                    return Ok(ReadOutcome { text, matched: None });
                }
                Ok(n) => {
                    if self.trace_io {
                        trace!("PromptStream: <<< {:?}", String::from_utf8_lossy(&chunk[..n]));
                    }
                    self.buffer.push(&chunk[..n]);
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(DeviceError::ReadFailure(e)),
            }
        }
    }

    /// Throw away buffered text and anything else the peer sends until it has
    /// been silent for `quiet`, or `limit` has passed. Returns the number of
    /// bytes discarded.
    pub fn discard_pending(&mut self, quiet: Duration, limit: Duration) -> Result<usize> {
        let deadline = deadline_after(limit)?;
        let mut discarded = self.buffer.buffered_len();
        self.buffer.clear();

        let mut chunk = [0u8; READ_CHUNK];
        while let Some(transport) = self.transport.as_mut() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match transport.read_available(&mut chunk, quiet.min(remaining)) {
                Ok(0) => break,
                Ok(n) => {
                    if self.trace_io {
                        trace!("PromptStream: discarded {:?}", String::from_utf8_lossy(&chunk[..n]));
                    }
                    discarded += n;
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) =>
                {
                    break
                }
                Err(e) => return Err(DeviceError::ReadFailure(e)),
            }
        }

        Ok(discarded)
    }

    /// Write `text` followed by CRLF.
    ///
    /// Text that is not ASCII fails with `IllegalArgument` and nothing is written.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        let line = PromptBuffer::encode_line(text)?;
        let transport = self
            .transport
            .as_mut()
            .ok_or_else(|| DeviceError::WriteFailure(closed_error()))?;

        if self.trace_io {
            trace!("PromptStream: >>> {:?}", String::from_utf8_lossy(&line));
        }
        transport.write_all(&line).map_err(DeviceError::WriteFailure)
    }

    /// Close the connection. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
            trace!("PromptStream: closed");
        }
    }

    /// Whether [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }
}

impl<T: Transport> Drop for PromptStream<T> {
    fn drop(&mut self) {
        self.close();
    }
}

fn deadline_after(timeout: Duration) -> Result<Instant> {
    Instant::now()
        .checked_add(timeout)
        .ok_or_else(|| DeviceError::IllegalArgument(format!("timeout {:?} is too large", timeout)))
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "prompt stream already closed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockConnector, Step};
    use crate::ErrorKind;

    const TIMEOUT: Duration = Duration::from_millis(150);

    fn stream(script: Vec<Step>) -> (MockConnector, PromptStream<crate::mock::MockTransport>) {
        let connector = MockConnector::new(script);
        let stream = PromptStream::open(&connector, "mock", 23, TIMEOUT, true).unwrap();
        (connector, stream)
    }

    #[test]
    fn test_read_until_across_chunks() {
        let (_connector, mut stream) = stream(vec![
            Step::Send(b"Login Please\r\nUser"),
            Step::Send(b"name :"),
        ]);
        let text = stream.read_until("Username :", TIMEOUT).unwrap();
        assert_eq!(text, "Login Please\r\nUsername :");
    }

    #[test]
    fn test_read_until_keeps_remainder_for_next_read() {
        let (_connector, mut stream) = stream(vec![Step::Send(b"PWSTA\r\nPWOFF\r\n")]);
        assert_eq!(stream.read_until("\n", TIMEOUT).unwrap(), "PWSTA\r\n");
        assert_eq!(stream.read_until("\n", TIMEOUT).unwrap(), "PWOFF\r\n");
    }

    #[test]
    fn test_read_until_times_out() {
        let (_connector, mut stream) = stream(vec![Step::Send(b"Login Please\r\n"), Step::Stall]);
        let start = Instant::now();
        let err = stream.read_until("Username :", TIMEOUT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(start.elapsed() >= TIMEOUT);
    }

    #[test]
    fn test_peer_close_returns_partial_text() {
        let (_connector, mut stream) = stream(vec![Step::Send(b"Login incorrect"), Step::Close]);
        let outcome = stream.read_until_any(&["Password :"], TIMEOUT).unwrap();
        assert_eq!(outcome.matched, None);
        assert_eq!(outcome.text, "Login incorrect");
    }

    #[test]
    fn test_discard_pending_clears_leftovers() {
        let (_connector, mut stream) = stream(vec![
            Step::Send(b"Welcome to TELNET.\r\n"),
            Step::Send(b"banner tail\r\n"),
            Step::AwaitWrite,
            Step::Send(b"PWSTA\r\n"),
        ]);
        stream.read_until("Welcome to TELNET.", TIMEOUT).unwrap();
        let discarded = stream
            .discard_pending(Duration::from_millis(20), TIMEOUT)
            .unwrap();
        assert_eq!(discarded, 2 + 13);

        stream.write_line("PWSTA").unwrap();
        assert_eq!(stream.read_until("\n", TIMEOUT).unwrap(), "PWSTA\r\n");
    }

    #[test]
    fn test_write_line_appends_crlf() {
        let (connector, mut stream) = stream(vec![]);
        stream.write_line("alice").unwrap();
        assert_eq!(connector.log().written, vec!["alice\r\n".to_string()]);
    }

    #[test]
    fn test_write_line_rejects_non_ascii() {
        let (connector, mut stream) = stream(vec![]);
        let err = stream.write_line("p\u{e4}ssw\u{f6}rd").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalArgument);
        assert!(connector.log().written.is_empty());
    }

    #[test]
    fn test_unrepresentable_timeout_is_illegal_argument() {
        let (_connector, mut stream) = stream(vec![Step::Stall]);
        let huge = Duration::from_secs(u64::MAX);
        assert_eq!(
            stream.read_until("\n", huge).unwrap_err().kind(),
            ErrorKind::IllegalArgument
        );
        assert_eq!(
            stream.discard_pending(TIMEOUT, huge).unwrap_err().kind(),
            ErrorKind::IllegalArgument
        );
    }

    #[test]
    fn test_write_failure() {
        let connector = MockConnector::new(vec![]).failing_writes();
        let mut stream = PromptStream::open(&connector, "mock", 23, TIMEOUT, false).unwrap();
        let err = stream.write_line("alice").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteFailure);
    }

    #[test]
    fn test_close_is_idempotent() {
        let (connector, mut stream) = stream(vec![]);
        stream.close();
        stream.close();
        assert!(stream.is_closed());
        drop(stream);
        assert_eq!(connector.log().closes, 1);
    }

    #[test]
    fn test_io_after_close_fails() {
        let (_connector, mut stream) = stream(vec![Step::Send(b"x")]);
        stream.close();
        assert_eq!(stream.write_line("x").unwrap_err().kind(), ErrorKind::WriteFailure);
        assert_eq!(
            stream.read_until("\n", TIMEOUT).unwrap_err().kind(),
            ErrorKind::ReadFailure
        );
    }

    #[test]
    fn test_open_failure_is_connection_failure() {
        let connector = MockConnector::refusing();
        let err = PromptStream::open(&connector, "mock", 23, TIMEOUT, false)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
    }
}
