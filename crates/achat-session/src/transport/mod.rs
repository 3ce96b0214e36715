//! Connection seam between the session and the socket.
//!
//! A `Connector` opens links; each link reports back through `LinkEvent`s
//! tagged with its `LinkId`, so the session can tell a live connection from
//! one it already discarded.

mod ws;

use std::fmt;

use achat_common::SessionError;

use crate::protocol::{InboundFrame, OutboundFrame};

pub use ws::{WsConnector, WsLink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened on a link.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEventKind {
    /// Handshake finished; frames can flow.
    Opened,
    Frame(InboundFrame),
    /// Closed by either side without a transport error.
    Closed,
    /// Connect or read/write failure. The link is gone.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkEvent {
    pub link: LinkId,
    pub kind: LinkEventKind,
}

/// An open (or opening) connection owned by the session.
pub trait Link {
    fn id(&self) -> LinkId;

    /// Queue a frame for sending. Never blocks.
    fn send(&mut self, frame: &OutboundFrame) -> Result<(), SessionError>;

    /// Ask the link to close. Safe to call on a link that already died.
    fn close(&mut self);
}

pub trait Connector {
    type Link: Link;

    /// Start connecting to `endpoint`. Progress arrives as `LinkEvent`s.
    fn open(&mut self, endpoint: &str) -> Self::Link;
}
