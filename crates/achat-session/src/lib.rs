//! Streaming chat session over a WebSocket.
//!
//! - `protocol`: the JSON frame shapes
//! - `transcript`: the finished message list
//! - `transport`: the connection seam and its `tokio-tungstenite` link
//! - `session`: the state machine tying them together

pub mod protocol;
pub mod session;
pub mod transcript;
pub mod transport;

pub use protocol::{
    CreateChunk, Identity, InboundFrame, OutboundFrame, ANSWER_PREFIX, PROBLEM_PREFIX,
};
pub use session::{ChatSession, SessionConfig, SessionState, SessionUpdate};
pub use transcript::{Message, Speaker, Transcript};
pub use transport::{Connector, Link, LinkEvent, LinkEventKind, LinkId, WsConnector, WsLink};
