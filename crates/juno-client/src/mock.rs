//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::transport::{Connector, Transport};

/// One thing the fake console does, in order.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Emit bytes on the next read.
    Send(&'static [u8]),
    /// Hold further output until the client has written one more line.
    AwaitWrite,
    /// Never say anything again.
    Stall,
    /// Close the connection.
    Close,
}

/// What the fake console observed.
#[derive(Debug, Clone, Default)]
pub struct MockLog {
    pub connects: usize,
    pub closes: usize,
    pub written: Vec<String>,
}

/// Hands out a fresh [`MockTransport`] running the same script per connection.
#[derive(Debug, Clone)]
pub struct MockConnector {
    script: Vec<Step>,
    refuse: bool,
    fail_writes: bool,
    log: Arc<Mutex<MockLog>>,
}

impl MockConnector {
    pub fn new(script: Vec<Step>) -> Self {
        MockConnector {
            script,
            refuse: false,
            fail_writes: false,
            log: Arc::new(Mutex::new(MockLog::default())),
        }
    }

    pub fn refusing() -> Self {
        MockConnector {
            refuse: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn log(&self) -> MockLog {
        self.log.lock().unwrap().clone()
    }
}

impl Connector for MockConnector {
    type Transport = MockTransport;

    fn connect(&self, _host: &str, _port: u16, _timeout: Duration) -> io::Result<MockTransport> {
        self.log.lock().unwrap().connects += 1;
        if self.refuse {
            return Err(io::Error::from(io::ErrorKind::ConnectionRefused));
        }
        Ok(MockTransport {
            steps: self.script.iter().copied().collect(),
            pending: Vec::new(),
            unread_writes: 0,
            fail_writes: self.fail_writes,
            log: Arc::clone(&self.log),
        })
    }
}

#[derive(Debug)]
pub struct MockTransport {
    steps: VecDeque<Step>,
    pending: Vec<u8>,
    unread_writes: usize,
    fail_writes: bool,
    log: Arc<Mutex<MockLog>>,
}

impl Transport for MockTransport {
    fn read_available(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        loop {
            if !self.pending.is_empty() {
                let n = self.pending.len().min(buf.len());
                buf[..n].copy_from_slice(&self.pending[..n]);
                self.pending.drain(..n);
                return Ok(n);
            }

            match self.steps.front().copied() {
                Some(Step::Send(bytes)) => {
                    self.steps.pop_front();
                    self.pending.extend_from_slice(bytes);
                }
                Some(Step::AwaitWrite) if self.unread_writes > 0 => {
                    self.steps.pop_front();
                    self.unread_writes -= 1;
                }
                Some(Step::Close) => return Ok(0),
                Some(Step::AwaitWrite) | Some(Step::Stall) | None => {
                    thread::sleep(timeout);
                    return Err(io::Error::from(io::ErrorKind::TimedOut));
                }
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.log
            .lock()
            .unwrap()
            .written
            .push(String::from_utf8_lossy(data).into_owned());
        self.unread_writes += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.log.lock().unwrap().closes += 1;
    }
}

/// Script of a console that accepts any login, then answers one command.
pub fn login_then(result: &'static [u8]) -> Vec<Step> {
    vec![
        Step::Send(b"\r\nLogin Please\r\nUsername :"),
        Step::AwaitWrite,
        Step::Send(b"Password :"),
        Step::AwaitWrite,
        Step::Send(b"\r\nWelcome to TELNET.\r\n"),
        Step::AwaitWrite,
        Step::Send(b"echo\r\n"),
        Step::Send(result),
    ]
}
