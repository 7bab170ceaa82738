//! Byte-stream transport.
//!
//! The session layer only needs three primitives from a connection: read whatever
//! arrives within a deadline, write bytes, and close. [`Connector`] opens such a
//! connection; [`TcpConnector`] is the telnet-over-TCP implementation used against
//! real hardware.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use juno_protocol::TelnetFilter;

/// Smallest read timeout handed to the socket. A zero timeout is rejected by
/// `set_read_timeout`.
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// An open, bidirectional byte stream.
pub trait Transport {
    /// Read whatever is available into `buf`, waiting at most `timeout`.
    ///
    /// Returns `Ok(0)` once the peer has closed the stream. If nothing arrives
    /// in time the error kind is `TimedOut` or `WouldBlock`.
    fn read_available(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize>;

    /// Write all of `data`.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Release the connection. Must be safe to call more than once.
    fn close(&mut self);
}

/// Opens transports.
pub trait Connector {
    /// The transport this connector produces.
    type Transport: Transport;

    /// Connect to `host:port`, giving up after `timeout`.
    fn connect(&self, host: &str, port: u16, timeout: Duration) -> io::Result<Self::Transport>;
}

/// Connects over TCP and speaks just enough telnet to refuse option requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Transport = TcpTransport;

    fn connect(&self, host: &str, port: u16, timeout: Duration) -> io::Result<TcpTransport> {
        let mut last_err = None;

        for addr in (host, port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    return Ok(TcpTransport::new(stream));
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no addresses found for {host}"),
            )
        }))
    }
}

/// A telnet connection over TCP.
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
    filter: TelnetFilter,
    raw: Vec<u8>,
}

impl TcpTransport {
    /// Wrap a connected stream.
    pub fn new(stream: TcpStream) -> Self {
        TcpTransport {
            stream: Some(stream),
            filter: TelnetFilter::new(),
            raw: Vec::new(),
        }
    }
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "connection closed")
}

impl Transport for TcpTransport {
    fn read_available(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        let deadline = Instant::now() + timeout;
        self.raw.resize(buf.len(), 0);

        loop {
            let remaining = deadline
                .saturating_duration_since(Instant::now())
                .max(MIN_READ_TIMEOUT);

            let stream = self.stream.as_mut().ok_or_else(not_connected)?;
            stream.set_read_timeout(Some(remaining))?;
            let n = stream.read(&mut self.raw)?;
            if n == 0 {
                return Ok(0);
            }

            let mut data = Vec::with_capacity(n);
            let mut replies = Vec::new();
            self.filter.feed(&self.raw[..n], &mut data, &mut replies);
            if !replies.is_empty() {
                stream.write_all(&replies)?;
            }

            // A read made entirely of negotiation bytes is not end-of-stream.
            if !data.is_empty() {
                buf[..data.len()].copy_from_slice(&data);
                return Ok(data.len());
            }
            if Instant::now() >= deadline {
                return Err(io::Error::from(io::ErrorKind::TimedOut));
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        stream.write_all(data)?;
        stream.flush()
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}
