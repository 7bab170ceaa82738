//! A fake Juno 451 console served over TCP on localhost.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use juno_client::SessionConfig;

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "secret";

/// One accepted connection, split for line reads.
pub struct Conn {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Conn {
    fn new(stream: TcpStream) -> Self {
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("set_read_timeout");
        let writer = stream.try_clone().expect("clone stream");
        Conn {
            reader: BufReader::new(stream),
            writer,
        }
    }

    pub fn send(&mut self, data: &[u8]) {
        self.writer.write_all(data).expect("console write");
        self.writer.flush().expect("console flush");
    }

    pub fn read_bytes(&mut self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        self.reader.read_exact(&mut buf).expect("console read");
        buf
    }

    /// Read one CRLF-terminated line, without the terminator.
    pub fn read_line(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).expect("console read");
        line.trim_end_matches(['\r', '\n']).to_string()
    }
}

/// Serve `connections` connections in order, each handled by `handler`.
///
/// Returns the port and a handle yielding every line each connection received.
pub fn spawn_console<F>(connections: usize, handler: F) -> (u16, JoinHandle<Vec<Vec<String>>>)
where
    F: Fn(&mut Conn) -> Vec<String> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local_addr").port();

    let handle = thread::spawn(move || {
        (0..connections)
            .map(|_| {
                let (stream, _) = listener.accept().expect("accept");
                let mut conn = Conn::new(stream);
                handler(&mut conn)
            })
            .collect()
    });

    (port, handle)
}

/// Behave like a Juno 451 that accepts `alice` / `secret` and answers one
/// command with `reply(command)`.
pub fn juno_console(conn: &mut Conn, reply: impl Fn(&str) -> String) -> Vec<String> {
    let mut received = Vec::new();

    conn.send(b"\r\nLogin Please\r\nUsername :");
    let username = conn.read_line();
    received.push(username.clone());
    if username != USERNAME {
        conn.send(b"\r\nLogin incorrect\r\n");
        return received;
    }

    conn.send(b"Password :");
    let password = conn.read_line();
    received.push(password.clone());
    if password != PASSWORD {
        conn.send(b"\r\nLogin incorrect\r\n\r\nLogin Please\r\nUsername :");
        return received;
    }

    conn.send(b"\r\nWelcome to TELNET.\r\n");
    let command = conn.read_line();
    received.push(command.clone());
    conn.send(format!("{}\r\n{}\r\n", command, reply(&command)).as_bytes());

    received
}

/// Settings pointing at the fake console.
pub fn config(port: u16) -> SessionConfig {
    SessionConfig::new("127.0.0.1", USERNAME, PASSWORD)
        .with_port(port)
        .with_timeout(Duration::from_millis(500))
        .with_settle_delay(Duration::ZERO)
}
