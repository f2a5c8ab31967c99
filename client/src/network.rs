use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{CodecError, OutboundMessage, PLAYER_NAME_PARAM};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("invalid server endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("connection task has stopped")]
    ChannelClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
    Errored,
}

/// Lifecycle and data events, delivered in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Opened,
    Message(String),
    /// Server closed the socket cleanly.
    Closed,
    /// Refused, dropped or broken connection.
    Failed(String),
}

/// Anything that can carry outbound commands to the server.
pub trait Outbox {
    fn send(&mut self, message: &OutboundMessage) -> Result<(), ConnectionError>;
}

/// Builds the connect URL with the player name as a query parameter.
pub fn endpoint_url(base: &str, player_name: &str) -> Result<Url, ConnectionError> {
    let mut url = Url::parse(base).map_err(|source| ConnectionError::InvalidEndpoint {
        endpoint: base.to_string(),
        source,
    })?;
    url.query_pairs_mut()
        .append_pair(PLAYER_NAME_PARAM, player_name);
    Ok(url)
}

/// Client side of one WebSocket. The socket lives on a Tokio task; this
/// handle exchanges text frames with it over channels.
pub struct Connection {
    url: Url,
    state: ConnectionState,
    outbound_tx: mpsc::UnboundedSender<String>,
    event_rx: mpsc::UnboundedReceiver<ConnectionEvent>,
}

impl Connection {
    /// Starts connecting in the background. Must be called from within a
    /// Tokio runtime.
    pub fn open(base: &str, player_name: &str) -> Result<Self, ConnectionError> {
        let url = endpoint_url(base, player_name)?;
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        info!("Connecting to {}", url);
        tokio::spawn(run_socket(url.clone(), outbound_rx, event_tx));

        Ok(Connection {
            url,
            state: ConnectionState::Connecting,
            outbound_tx,
            event_rx,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Next event if one is already waiting.
    pub fn try_next_event(&mut self) -> Option<ConnectionEvent> {
        let event = self.event_rx.try_recv().ok()?;
        self.observe(&event);
        Some(event)
    }

    /// Waits for the next event. `None` once the socket task is gone and
    /// every event has been drained.
    pub async fn next_event(&mut self) -> Option<ConnectionEvent> {
        let event = self.event_rx.recv().await?;
        self.observe(&event);
        Some(event)
    }

    fn observe(&mut self, event: &ConnectionEvent) {
        match event {
            ConnectionEvent::Opened => self.state = ConnectionState::Open,
            ConnectionEvent::Closed => self.state = ConnectionState::Closed,
            ConnectionEvent::Failed(_) => self.state = ConnectionState::Errored,
            ConnectionEvent::Message(_) => {}
        }
    }
}

impl Outbox for Connection {
    /// Fire-and-forget: the frame is queued for the socket task.
    fn send(&mut self, message: &OutboundMessage) -> Result<(), ConnectionError> {
        let text = message.encode()?;
        debug!("Sending {}", text);
        self.outbound_tx
            .send(text)
            .map_err(|_| ConnectionError::ChannelClosed)
    }
}

async fn run_socket(
    url: Url,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
    event_tx: mpsc::UnboundedSender<ConnectionEvent>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            error!("Failed to connect to {}: {}", url, e);
            let _ = event_tx.send(ConnectionEvent::Failed(e.to_string()));
            return;
        }
    };

    info!("web socket connected with server");
    if event_tx.send(ConnectionEvent::Opened).is_err() {
        return;
    }

    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    debug!("receive message from server: {}", text);
                    if event_tx.send(ConnectionEvent::Message(text)).is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    info!("Server closed the connection: {:?}", frame);
                    let _ = event_tx.send(ConnectionEvent::Closed);
                    break;
                }
                Some(Ok(other)) => {
                    debug!("Ignoring non-text frame: {:?}", other);
                }
                Some(Err(e)) => {
                    error!("Connection error: {}", e);
                    let _ = event_tx.send(ConnectionEvent::Failed(e.to_string()));
                    break;
                }
                None => {
                    error!("Connection dropped without a close frame");
                    let _ = event_tx.send(ConnectionEvent::Failed("connection dropped".to_string()));
                    break;
                }
            },

            outbound = outbound_rx.recv() => match outbound {
                Some(text) => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        warn!("Error sending message: {}", e);
                    }
                }
                // Every handle is gone; nothing left to serve.
                None => break,
            },
        }
    }
}
