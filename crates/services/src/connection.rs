//! One logical WebSocket connection to the question service.
//!
//! The connection owns a background reader task that parses inbound frames
//! into [`quiz_core::protocol::ServerEvent`]s and forwards them over an
//! unbounded channel. Malformed frames are logged and dropped so a protocol
//! violation never crashes the state machine; transport errors surface once
//! as [`InboundEvent::Fatal`] and the host is expected to restart.

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use quiz_core::model::{ClientIdentity, Mode};
use quiz_core::protocol::{ClientEvent, ServerEvent, session_endpoint};

use crate::error::ConnectionError;

/// Where the question service lives.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// `ws(s)://host[:port]/` base of the WebSocket endpoints.
    pub ws_base: Url,
}

/// Everything the reader task can hand to the session loop.
#[derive(Debug)]
pub enum InboundEvent {
    Server(ServerEvent),
    /// Transport-level failure. Terminal for this connection.
    Fatal(ConnectionError),
}

/// Outbound half of a session channel, behind a trait so the session loop
/// can run against an in-memory fake in tests.
#[async_trait]
pub trait SessionChannel: Send {
    /// Put one message on the wire.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` when the message cannot be serialized or
    /// the transport rejects it.
    async fn send(&mut self, event: ClientEvent) -> Result<(), ConnectionError>;

    /// Tear the channel down. Idempotent.
    async fn close(&mut self);
}

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Live WebSocket session channel.
pub struct SessionConnection {
    sink: WsSink,
    reader: JoinHandle<()>,
}

impl SessionConnection {
    /// Establish a connection for the given mode and identity.
    ///
    /// Returns the outbound channel half and the inbound event receiver.
    /// The session's opening `GET_QUESTION` is issued by the session loop
    /// immediately after establishment.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` when the endpoint cannot be built or the
    /// WebSocket handshake fails.
    pub async fn open(
        config: &ConnectionConfig,
        mode: Mode,
        identity: Option<&ClientIdentity>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<InboundEvent>), ConnectionError> {
        let endpoint = session_endpoint(&config.ws_base, mode, identity)?;
        tracing::info!(%endpoint, "opening session connection");

        let (stream, _response) = connect_async(endpoint.as_str()).await?;
        let (sink, mut source) = stream.split();
        let (tx, rx) = mpsc::unbounded_channel();

        let reader = tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => match ServerEvent::from_json(&text) {
                        Ok(event) => {
                            tracing::debug!(?event, "inbound event");
                            if tx.send(InboundEvent::Server(event)).is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            tracing::warn!(%err, "dropping malformed inbound frame");
                        }
                    },
                    Ok(Message::Close(_)) => {
                        let _ = tx.send(InboundEvent::Fatal(ConnectionError::Closed));
                        break;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        let _ = tx.send(InboundEvent::Fatal(ConnectionError::Transport(err)));
                        break;
                    }
                }
            }
        });

        Ok((Self { sink, reader }, rx))
    }
}

#[async_trait]
impl SessionChannel for SessionConnection {
    async fn send(&mut self, event: ClientEvent) -> Result<(), ConnectionError> {
        let text = event.to_json()?;
        self.sink
            .send(Message::Text(text))
            .await
            .map_err(ConnectionError::Transport)
    }

    async fn close(&mut self) {
        let _ = self.sink.send(Message::Close(None)).await;
        self.reader.abort();
    }
}

/// In-memory channel pair for tests and headless hosts.
pub struct InMemoryChannel {
    sent: mpsc::UnboundedSender<ClientEvent>,
}

/// Far end of an [`InMemoryChannel`]: observe what the client sent and
/// inject inbound events, playing the role of the question service.
pub struct ChannelProbe {
    pub sent: mpsc::UnboundedReceiver<ClientEvent>,
    pub inbound: mpsc::UnboundedSender<InboundEvent>,
}

impl InMemoryChannel {
    /// Build a connected channel/probe pair plus the inbound receiver to
    /// hand to the session loop.
    #[must_use]
    pub fn open() -> (Self, mpsc::UnboundedReceiver<InboundEvent>, ChannelProbe) {
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        (
            Self { sent: sent_tx },
            inbound_rx,
            ChannelProbe {
                sent: sent_rx,
                inbound: inbound_tx,
            },
        )
    }
}

#[async_trait]
impl SessionChannel for InMemoryChannel {
    async fn send(&mut self, event: ClientEvent) -> Result<(), ConnectionError> {
        self.sent
            .send(event)
            .map_err(|_| ConnectionError::Closed)
    }

    async fn close(&mut self) {}
}
