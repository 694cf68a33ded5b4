//! Chat Session
//!
//! The conversation shown on the companion screen. A session lives for one
//! visit to that screen and allows a single request in flight.
//!
//! # Request Tokens
//!
//! [`ChatSession::send`] hands back a [`PendingRequest`] carrying a
//! [`RequestToken`]. Whoever runs the request returns the token with the
//! reply; a reply whose token does not match the one in flight (because the
//! session was replaced, or the request was already answered) is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// First message of every session
pub const GREETING: &str = "Hello! I'm Aura. How are you feeling today?";

/// Who wrote a message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    /// The person using the app
    User,
    /// Aura
    Companion,
}

/// One line of the conversation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    /// Author
    pub sender: Sender,
    /// Message body
    pub text: String,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }
}

/// Identity of one request, unique across all sessions in the process
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req_{}", self.0)
    }
}

/// A request the surface must run and report back
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    /// Pass back to [`ChatSession::complete`]
    pub token: RequestToken,
    /// The user's text, untrimmed
    pub prompt: String,
}

/// Conversation state for one visit to the chat screen
#[derive(Clone, Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    in_flight: Option<RequestToken>,
}

impl ChatSession {
    /// A session holding only the greeting
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::new(Sender::Companion, GREETING)],
            in_flight: None,
        }
    }

    /// Conversation so far, oldest first
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a reply is awaited
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Token of the request in flight
    #[must_use]
    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight
    }

    /// Submit user text
    ///
    /// Returns `None` (and changes nothing) when the text is blank or a
    /// reply is still awaited.
    pub fn send(&mut self, text: &str) -> Option<PendingRequest> {
        if text.trim().is_empty() || self.is_pending() {
            return None;
        }
        let token = RequestToken::next();
        self.messages.push(ChatMessage::new(Sender::User, text));
        self.in_flight = Some(token);
        tracing::debug!(%token, "Chat request issued");
        Some(PendingRequest {
            token,
            prompt: text.to_string(),
        })
    }

    /// Deliver a reply. Returns false if `token` is not the one in flight.
    pub fn complete(&mut self, token: RequestToken, reply: impl Into<String>) -> bool {
        if self.in_flight != Some(token) {
            tracing::debug!(%token, "Discarding stale chat reply");
            return false;
        }
        self.messages.push(ChatMessage::new(Sender::Companion, reply));
        self.in_flight = None;
        true
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
