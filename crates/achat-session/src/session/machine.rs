//! The chat session state machine.

use achat_common::{NoticeKind, NotificationBridge, SessionError};
use tracing::{debug, info, warn};

use super::types::{SessionConfig, SessionState, SessionUpdate};
use crate::protocol::{CreateChunk, CreateRequest, InboundFrame, OutboundFrame, ANSWER_PREFIX};
use crate::transcript::{Message, Transcript};
use crate::transport::{Connector, Link, LinkEvent, LinkEventKind};

/// One chat widget's worth of state: transcript, connection, and the
/// reply currently being accumulated.
///
/// The session never blocks. Prompts go in through [`send_prompt`], link
/// progress through [`handle_event`]; both run on the caller's loop.
///
/// [`send_prompt`]: ChatSession::send_prompt
/// [`handle_event`]: ChatSession::handle_event
pub struct ChatSession<C: Connector> {
    config: SessionConfig,
    connector: C,
    link: Option<C::Link>,
    state: SessionState,
    transcript: Transcript,
    /// Accumulator for the in-flight reply.
    pending: String,
    /// Prompt waiting for the link handshake.
    queued: Option<String>,
    notifier: NotificationBridge,
}

impl<C: Connector> ChatSession<C> {
    pub fn new(config: SessionConfig, connector: C, notifier: NotificationBridge) -> Self {
        let transcript = Transcript::new(config.max_messages);
        Self {
            config,
            connector,
            link: None,
            state: SessionState::Idle,
            transcript,
            pending: String::new(),
            queued: None,
            notifier,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Partial reply accumulated so far in this round trip.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    pub fn notifier_mut(&mut self) -> &mut NotificationBridge {
        &mut self.notifier
    }

    /// Echo `text` into the transcript and send it as a create request,
    /// opening a connection first if there is none.
    ///
    /// Rejected while a reply is in flight.
    pub fn send_prompt(&mut self, text: &str) -> Result<(), SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyPrompt);
        }
        if self.state != SessionState::Idle {
            warn!(state = %self.state, "prompt rejected while a reply is in flight");
            return Err(SessionError::Busy);
        }

        self.transcript.push(Message::problem(text));

        if let Some(link) = self.link.as_mut() {
            let frame = OutboundFrame::create(CreateRequest::new(text, &self.config.identity));
            if let Err(e) = link.send(&frame) {
                warn!(error = %e, "failed to send prompt");
                self.teardown();
                self.notifier.notify_network_error();
                return Err(e);
            }
            debug!(link = %link.id(), "prompt sent on open link");
            self.begin_round_trip();
        } else {
            let link = self.connector.open(&self.config.endpoint);
            info!(link = %link.id(), endpoint = %self.config.endpoint, "opening link");
            self.link = Some(link);
            self.queued = Some(text.to_string());
            self.state = SessionState::Connecting;
        }
        Ok(())
    }

    /// Feed one link event through the state machine.
    pub fn handle_event(&mut self, event: LinkEvent) -> SessionUpdate {
        let current = self.link.as_ref().map(Link::id);
        if current != Some(event.link) {
            debug!(link = %event.link, "event from a discarded link");
            return SessionUpdate::Ignored;
        }

        match event.kind {
            LinkEventKind::Opened => self.on_opened(),
            LinkEventKind::Frame(frame) => self.on_frame(frame),
            LinkEventKind::Closed => {
                info!(link = %event.link, "link closed");
                self.teardown();
                SessionUpdate::Closed
            }
            LinkEventKind::Failed(reason) => {
                warn!(link = %event.link, reason = %reason, "link failed");
                self.fail()
            }
        }
    }

    /// Cancel the reply in flight. Whatever streamed so far is kept as a
    /// message.
    ///
    /// The server closes its side after a stop, so the link is dropped too
    /// and the next prompt opens a fresh one.
    pub fn stop(&mut self) -> Result<Option<Message>, SessionError> {
        match self.state {
            SessionState::Idle => Err(SessionError::NotBusy),
            SessionState::Connecting => {
                info!("stopped before the link opened");
                self.teardown();
                Ok(None)
            }
            SessionState::Busy => {
                if let Some(link) = self.link.as_mut() {
                    if let Err(e) = link.send(&OutboundFrame::stop()) {
                        warn!(error = %e, "failed to send stop");
                    }
                    info!(link = %link.id(), "reply stopped");
                }
                let partial = std::mem::take(&mut self.pending);
                self.teardown();
                if partial.is_empty() {
                    return Ok(None);
                }
                let message = Message::answer(partial);
                self.transcript.push(message.clone());
                Ok(Some(message))
            }
        }
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
        self.notifier.notify_success(NoticeKind::Cleared);
    }

    /// Remove the latest message, if any.
    pub fn delete_last(&mut self) -> Option<Message> {
        let removed = self.transcript.delete_last();
        if removed.is_some() {
            self.notifier.notify_success(NoticeKind::Deleted);
        }
        removed
    }

    /// Drop the connection, transcript, and any partial reply.
    pub fn reset(&mut self) {
        self.teardown();
        self.transcript.clear();
        self.notifier.notify_success(NoticeKind::Reset);
    }

    /// Close the connection without touching the transcript.
    pub fn disconnect(&mut self) {
        if self.link.is_some() {
            info!("disconnecting");
        }
        self.teardown();
    }

    fn on_opened(&mut self) -> SessionUpdate {
        if self.state != SessionState::Connecting {
            debug!(state = %self.state, "unexpected open");
            return SessionUpdate::Ignored;
        }
        let Some(prompt) = self.queued.take() else {
            self.state = SessionState::Idle;
            return SessionUpdate::Connected;
        };

        let frame = OutboundFrame::create(CreateRequest::new(prompt, &self.config.identity));
        let sent = match self.link.as_mut() {
            Some(link) => link.send(&frame),
            None => Err(SessionError::Transport("link vanished".into())),
        };
        if let Err(e) = sent {
            warn!(error = %e, "failed to send queued prompt");
            return self.fail();
        }
        self.begin_round_trip();
        SessionUpdate::Connected
    }

    fn on_frame(&mut self, frame: InboundFrame) -> SessionUpdate {
        match frame {
            InboundFrame::Create(chunk) => self.on_chunk(chunk),
            InboundFrame::Error { detail } => {
                warn!(detail = detail.as_deref().unwrap_or(""), "server reported an error");
                self.fail()
            }
            InboundFrame::Unknown(cmd) => {
                debug!(cmd = %cmd, "ignoring frame");
                SessionUpdate::Ignored
            }
        }
    }

    fn on_chunk(&mut self, chunk: CreateChunk) -> SessionUpdate {
        if self.state != SessionState::Busy {
            debug!(state = %self.state, "chunk outside a round trip");
            return SessionUpdate::Ignored;
        }

        let mut delta = String::new();
        if self.pending.is_empty() {
            delta.push_str(ANSWER_PREFIX);
        }
        delta.push_str(&chunk.c);
        self.pending.push_str(&delta);

        if !chunk.done {
            return SessionUpdate::Chunk(delta);
        }

        debug!(
            chunks = chunk.chunks.as_deref().unwrap_or("-"),
            workflow = chunk.workflow.as_deref().unwrap_or("-"),
            sources = chunk.db_source.is_some(),
            "reply finished"
        );
        let message = Message::answer(std::mem::take(&mut self.pending));
        self.transcript.push(message.clone());
        self.state = SessionState::Idle;
        SessionUpdate::Finished {
            tail: delta,
            message,
        }
    }

    fn begin_round_trip(&mut self) {
        self.pending.clear();
        self.state = SessionState::Busy;
    }

    /// Tear down and show the generic network error.
    fn fail(&mut self) -> SessionUpdate {
        self.teardown();
        self.notifier.notify_network_error();
        SessionUpdate::Failed
    }

    fn teardown(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.close();
        }
        self.state = SessionState::Idle;
        self.pending.clear();
        self.queued = None;
    }
}

impl<C: Connector> std::fmt::Debug for ChatSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("state", &self.state)
            .field("connected", &self.link.is_some())
            .field("messages", &self.transcript.len())
            .finish_non_exhaustive()
    }
}
