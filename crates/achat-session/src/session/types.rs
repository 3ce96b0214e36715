//! Session state, settings, and the updates handed back to the front end.

use std::fmt;

use crate::protocol::Identity;
use crate::transcript::Message;

/// Where the session is in a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// A link was opened and the prompt is waiting for the handshake.
    Connecting,
    /// A create frame is out and the reply is streaming.
    Busy,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Busy => "busy",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket URL of the chat endpoint.
    pub endpoint: String,
    pub identity: Identity,
    pub max_messages: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:5012/ds-ws".into(),
            identity: Identity::default(),
            max_messages: 1000,
        }
    }
}

/// Result of feeding one link event into the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// Nothing visible changed.
    Ignored,
    /// Handshake done, the queued prompt went out.
    Connected,
    /// Text appended to the partial answer. The first delta of a round
    /// trip includes the answer prefix.
    Chunk(String),
    /// The reply is complete. `tail` is the final delta.
    Finished { tail: String, message: Message },
    /// The round trip failed and a network-error toast was shown.
    Failed,
    /// The connection closed cleanly.
    Closed,
}
