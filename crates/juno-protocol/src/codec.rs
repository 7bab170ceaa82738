//! Prompt buffer for the telnet console.
//!
//! The console has no framing beyond literal prompts and newlines. Incoming bytes
//! are accumulated here until a caller-supplied literal pattern shows up, at which
//! point everything up to and including the pattern is split off. Anything after
//! the pattern stays buffered for the next read.

use bytes::BytesMut;

use crate::constants::LINE_TERMINATOR;
use crate::error::{ProtocolError, ProtocolResult};

/// Initial buffer capacity. Login banners are a few hundred bytes.
const INITIAL_CAPACITY: usize = 512;

/// Text split off the buffer by a successful pattern match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMatch {
    /// Index into the pattern list of the pattern that matched.
    pub pattern_index: usize,
    /// Everything read up to and including the matched pattern.
    pub text: String,
}

/// Accumulates received bytes and splits them at literal prompt patterns.
#[derive(Debug)]
pub struct PromptBuffer {
    buffer: BytesMut,
}

impl Default for PromptBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuffer {
    /// Create an empty prompt buffer.
    pub fn new() -> Self {
        PromptBuffer {
            buffer: BytesMut::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Byte offset of the first occurrence of `pattern`, if any.
    pub fn find(&self, pattern: &str) -> Option<usize> {
        let needle = pattern.as_bytes();
        if needle.is_empty() {
            return Some(0);
        }
        self.buffer
            .windows(needle.len())
            .position(|window| window == needle)
    }

    /// Split off everything through the first occurrence of `pattern`.
    ///
    /// Returns `None` (leaving the buffer untouched) if the pattern has not
    /// arrived yet.
    pub fn take_through(&mut self, pattern: &str) -> Option<String> {
        self.take_through_any(&[pattern]).map(|m| m.text)
    }

    /// Split off everything through the earliest-ending match of any pattern.
    ///
    /// When two patterns end at the same offset the one listed first wins.
    pub fn take_through_any(&mut self, patterns: &[&str]) -> Option<PromptMatch> {
        let mut best: Option<(usize, usize)> = None;

        for (index, pattern) in patterns.iter().enumerate() {
            if let Some(start) = self.find(pattern) {
                let end = start + pattern.len();
                if best.map_or(true, |(_, best_end)| end < best_end) {
                    best = Some((index, end));
                }
            }
        }

        let (pattern_index, end) = best?;
        let taken = self.buffer.split_to(end);
        Some(PromptMatch {
            pattern_index,
            text: String::from_utf8_lossy(&taken).into_owned(),
        })
    }

    /// Drain the whole buffer as text.
    pub fn take_all(&mut self) -> String {
        let taken = self.buffer.split();
        String::from_utf8_lossy(&taken).into_owned()
    }

    /// Encode a line for transmission.
    ///
    /// Appends the CRLF terminator. The console only understands ASCII, so any
    /// other character is rejected rather than sent.
    pub fn encode_line(text: &str) -> ProtocolResult<Vec<u8>> {
        ensure_ascii("line", text)?;
        let mut buf = Vec::with_capacity(text.len() + LINE_TERMINATOR.len());
        buf.extend_from_slice(text.as_bytes());
        buf.extend_from_slice(LINE_TERMINATOR.as_bytes());
        Ok(buf)
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Get the current buffer contents as a string (for debugging).
    pub fn buffer_as_str(&self) -> String {
        String::from_utf8_lossy(&self.buffer).to_string()
    }
}

/// Reject `text` unless every character is ASCII. `what` names the value in
/// the error message.
pub fn ensure_ascii(what: &str, text: &str) -> ProtocolResult<()> {
    match text.char_indices().find(|(_, c)| !c.is_ascii()) {
        None => Ok(()),
        Some((at, c)) => Err(ProtocolError::IllegalArgument(format!(
            "{what} contains non-ASCII character {c:?} at byte {at}"
        ))),
    }
}
