//! Console login.
//!
//! The Juno 451 prints a greeting and asks for a username, then a password, then
//! prints a welcome banner. Each step reads with the session timeout and the text
//! read so far decides whether the step succeeded:
//!
//! 1. `Login Please` ... `Username :`, anything else is the wrong device
//! 2. `Password :`, otherwise the username was rejected
//! 3. `Welcome to TELNET.`, otherwise the password was rejected
//!
//! A rejected login makes the console start over with `Username :`, so that
//! prompt also ends steps 2 and 3 early instead of waiting out the timeout.

use std::thread;
use std::time::Duration;

use juno_protocol::{
    GREETING, PASSWORD_MARKER, PASSWORD_PROMPT, USERNAME_PROMPT, WELCOME_BANNER, WELCOME_MARKER,
};
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::{DeviceError, Result};
use crate::stream::PromptStream;
use crate::transport::{Connector, Transport};

/// How long the console must stay silent after the settle delay before the
/// first command is written.
const QUIET_PERIOD: Duration = Duration::from_millis(50);

/// Login progress. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandshakeState {
    /// No connection yet.
    Disconnected,
    /// Connected, waiting for the greeting and username prompt.
    AwaitingUsernamePrompt,
    /// Username written.
    UsernameSent,
    /// Waiting for the password prompt.
    AwaitingPasswordPrompt,
    /// Password written.
    PasswordSent,
    /// Waiting for the welcome banner.
    AwaitingWelcome,
    /// Logged in; commands may be sent.
    Authenticated,
}

/// Drives one login over one connection.
#[derive(Debug)]
pub struct Handshake<'a> {
    config: &'a SessionConfig,
    state: HandshakeState,
}

impl<'a> Handshake<'a> {
    /// Start a handshake in the [`Disconnected`](HandshakeState::Disconnected) state.
    pub fn new(config: &'a SessionConfig) -> Self {
        Handshake {
            config,
            state: HandshakeState::Disconnected,
        }
    }

    /// Current state.
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Open a connection through `connector` and log in.
    ///
    /// The settings are validated first; invalid ones fail with
    /// `IllegalArgument` before any connection is made. On failure the
    /// connection is closed before the error is returned.
    pub fn connect<C: Connector>(&mut self, connector: &C) -> Result<PromptStream<C::Transport>> {
        let config = self.config;
        self.expect_fresh()?;
        config
            .validate()
            .map_err(|e| DeviceError::IllegalArgument(e.to_string()))?;

        let mut stream = PromptStream::open(
            connector,
            &config.host,
            config.port,
            config.timeout,
            config.debug,
        )?;
        self.advance(HandshakeState::AwaitingUsernamePrompt);

        // `stream` drops (and closes) on the error path.
        self.login(&mut stream)?;
        Ok(stream)
    }

    /// Log in over an open stream.
    ///
    /// A handshake logs in once. Calling this after a login has started, or
    /// finished, fails with `IllegalArgument`.
    pub fn login<T: Transport>(&mut self, stream: &mut PromptStream<T>) -> Result<()> {
        let config = self.config;
        let timeout = config.timeout;

        match self.state {
            HandshakeState::Disconnected => self.advance(HandshakeState::AwaitingUsernamePrompt),
            HandshakeState::AwaitingUsernamePrompt => {}
            state => return Err(already_started(state)),
        }

        let outcome = stream.read_until_any(&[USERNAME_PROMPT], timeout)?;
        if outcome.matched.is_none() || !outcome.text.contains(GREETING) {
            warn!("Juno451[{}]: unexpected greeting {:?}", config.host, outcome.text);
            return Err(DeviceError::ProtocolMismatch {
                received: outcome.text,
            });
        }
        stream.write_line(&config.username)?;
        self.advance(HandshakeState::UsernameSent);

        self.advance(HandshakeState::AwaitingPasswordPrompt);
        let outcome = stream.read_until_any(&[PASSWORD_PROMPT, USERNAME_PROMPT], timeout)?;
        if !outcome.text.contains(PASSWORD_MARKER) {
            debug!("Juno451[{}]: username rejected: {:?}", config.host, outcome.text);
            return Err(DeviceError::InvalidUsername {
                username: config.username.clone(),
            });
        }
        stream.write_line(&config.password)?;
        self.advance(HandshakeState::PasswordSent);

        self.advance(HandshakeState::AwaitingWelcome);
        let outcome =
            stream.read_until_any(&[WELCOME_BANNER, USERNAME_PROMPT, PASSWORD_PROMPT], timeout)?;
        if !outcome.text.contains(WELCOME_MARKER) {
            debug!("Juno451[{}]: password rejected: {:?}", config.host, outcome.text);
            return Err(DeviceError::InvalidPassword);
        }
        self.advance(HandshakeState::Authenticated);

        // The console keeps printing after the banner; a command written now
        // would have its echo mixed up with the tail of the banner.
        if !config.settle_delay.is_zero() {
            thread::sleep(config.settle_delay);
        }
        let discarded = stream.discard_pending(QUIET_PERIOD, timeout)?;
        if discarded > 0 {
            debug!("Juno451[{}]: discarded {} bytes after login", config.host, discarded);
        }

        Ok(())
    }

    fn expect_fresh(&self) -> Result<()> {
        match self.state {
            HandshakeState::Disconnected => Ok(()),
            state => Err(already_started(state)),
        }
    }

    fn advance(&mut self, next: HandshakeState) {
        debug_assert!(next > self.state, "handshake cannot move back");
        debug!("Juno451[{}]: {:?} -> {:?}", self.config.host, self.state, next);
        self.state = next;
    }
}

fn already_started(state: HandshakeState) -> DeviceError {
    DeviceError::IllegalArgument(format!("login already attempted (state {:?})", state))
}
