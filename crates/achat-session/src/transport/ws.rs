//! WebSocket links over `tokio-tungstenite`.
//!
//! Every link runs in its own task: it connects, reports `Opened`, then
//! forwards queued frames out and parsed frames in until either side
//! closes. There is no reconnect; a dead link stays dead.

use std::time::Duration;

use achat_common::SessionError;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use super::{Connector, Link, LinkEvent, LinkEventKind, LinkId};
use crate::protocol::{self, OutboundFrame};

#[derive(Debug)]
enum LinkCommand {
    Send(String),
    Close,
}

/// Opens WebSocket links that all report into one event channel.
pub struct WsConnector {
    event_tx: mpsc::Sender<LinkEvent>,
    connect_timeout: Duration,
    next_id: u64,
}

impl WsConnector {
    /// Returns `(connector, event_receiver)`.
    pub fn new(connect_timeout: Duration) -> (Self, mpsc::Receiver<LinkEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let connector = Self {
            event_tx,
            connect_timeout,
            next_id: 0,
        };
        (connector, event_rx)
    }
}

impl Connector for WsConnector {
    type Link = WsLink;

    /// Must be called from within a tokio runtime.
    fn open(&mut self, endpoint: &str) -> WsLink {
        self.next_id += 1;
        let id = LinkId(self.next_id);
        let (command_tx, command_rx) = mpsc::channel(64);

        tokio::spawn(link_task(
            id,
            endpoint.to_string(),
            self.connect_timeout,
            self.event_tx.clone(),
            command_rx,
        ));

        WsLink { id, command_tx }
    }
}

/// Handle to one link task.
#[derive(Debug)]
pub struct WsLink {
    id: LinkId,
    command_tx: mpsc::Sender<LinkCommand>,
}

impl Link for WsLink {
    fn id(&self) -> LinkId {
        self.id
    }

    fn send(&mut self, frame: &OutboundFrame) -> Result<(), SessionError> {
        let json = frame.to_json()?;
        self.command_tx
            .try_send(LinkCommand::Send(json))
            .map_err(|e| SessionError::Transport(format!("link {} unavailable: {e}", self.id)))
    }

    fn close(&mut self) {
        let _ = self.command_tx.try_send(LinkCommand::Close);
    }
}

async fn link_task(
    id: LinkId,
    url: String,
    connect_timeout: Duration,
    event_tx: mpsc::Sender<LinkEvent>,
    mut command_rx: mpsc::Receiver<LinkCommand>,
) {
    info!(link = %id, url = %url, "Connecting");

    let ws_stream = match tokio::time::timeout(
        connect_timeout,
        tokio_tungstenite::connect_async(url.as_str()),
    )
    .await
    {
        Ok(Ok((ws_stream, _))) => ws_stream,
        Ok(Err(e)) => {
            error!(link = %id, error = %e, "Failed to connect");
            let reason = format!("Connection failed: {e}");
            emit(&event_tx, id, LinkEventKind::Failed(reason)).await;
            return;
        }
        Err(_elapsed) => {
            error!(link = %id, "Connection timed out after {:?}", connect_timeout);
            let reason = format!("Connection timed out after {}s", connect_timeout.as_secs());
            emit(&event_tx, id, LinkEventKind::Failed(reason)).await;
            return;
        }
    };

    info!(link = %id, "Connected");
    emit(&event_tx, id, LinkEventKind::Opened).await;

    let (mut ws_write, mut ws_read) = ws_stream.split();

    loop {
        tokio::select! {
            command = command_rx.recv() => match command {
                Some(LinkCommand::Send(json)) => {
                    if let Err(e) = ws_write.send(WsMessage::Text(json.into())).await {
                        warn!(link = %id, error = %e, "WebSocket write failed");
                        emit(&event_tx, id, LinkEventKind::Failed(e.to_string())).await;
                        return;
                    }
                }
                Some(LinkCommand::Close) | None => {
                    let _ = ws_write.send(WsMessage::Close(None)).await;
                    info!(link = %id, "Closed by client");
                    emit(&event_tx, id, LinkEventKind::Closed).await;
                    return;
                }
            },
            message = ws_read.next() => match message {
                Some(Ok(WsMessage::Text(text))) => match protocol::parse_inbound(&text) {
                    Ok(frame) => emit(&event_tx, id, LinkEventKind::Frame(frame)).await,
                    Err(e) => debug!(link = %id, error = %e, "Unrecognized message"),
                },
                Some(Ok(WsMessage::Close(_))) | None => {
                    info!(link = %id, "Server closed connection");
                    emit(&event_tx, id, LinkEventKind::Closed).await;
                    return;
                }
                Some(Err(e)) => {
                    warn!(link = %id, error = %e, "WebSocket error");
                    emit(&event_tx, id, LinkEventKind::Failed(e.to_string())).await;
                    return;
                }
                Some(Ok(_)) => {}
            },
        }
    }
}

async fn emit(event_tx: &mpsc::Sender<LinkEvent>, link: LinkId, kind: LinkEventKind) {
    let _ = event_tx.send(LinkEvent { link, kind }).await;
}
