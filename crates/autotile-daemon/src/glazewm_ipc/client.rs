//! GlazeWM IPC transport
//!
//! GlazeWM exposes a WebSocket server (by default on `ws://127.0.0.1:6123`)
//! that speaks plain text frames: clients send commands such as
//! `sub -e focus_changed`, and the server pushes JSON event frames.
//!
//! The supervisor only talks to the traits in this module, so tests can
//! script connections without a socket.

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

use super::types::OutboundFrame;
use super::IpcError;

/// Upper bound on the close handshake when tearing a connection down
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Opens connections to the IPC server
#[async_trait]
pub trait Dialer: Send {
    type Connection: EventConnection;

    /// Endpoint used for log lines
    fn endpoint(&self) -> &str;

    /// Open one connection
    async fn dial(&mut self) -> Result<Self::Connection, IpcError>;
}

/// One open duplex connection to the IPC server
#[async_trait]
pub trait EventConnection: Send {
    /// Send a single text frame
    async fn send_frame(&mut self, frame: OutboundFrame) -> Result<(), IpcError>;

    /// Wait for the next text frame
    ///
    /// Blocks without a timeout; a quiet connection is a healthy one.
    async fn next_frame(&mut self) -> Result<String, IpcError>;

    /// Best-effort close. Never fails.
    async fn close(&mut self);
}

/// WebSocket dialer for the GlazeWM IPC server
#[derive(Debug, Clone)]
pub struct GlazeDialer {
    endpoint: String,
    connect_timeout: Duration,
}

impl GlazeDialer {
    /// Create a dialer for a `ws://` endpoint
    ///
    /// # Errors
    ///
    /// Returns `IpcError::InvalidEndpoint` if the endpoint is not a plain
    /// `ws://` URL. TLS is not compiled into the transport.
    pub fn new(endpoint: impl Into<String>, connect_timeout: Duration) -> Result<Self, IpcError> {
        let endpoint = endpoint.into();

        let url = url::Url::parse(&endpoint).map_err(|e| IpcError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "ws" {
            return Err(IpcError::InvalidEndpoint {
                reason: format!("unsupported scheme `{}`, expected ws", url.scheme()),
                endpoint,
            });
        }

        Ok(Self {
            endpoint,
            connect_timeout,
        })
    }
}

#[async_trait]
impl Dialer for GlazeDialer {
    type Connection = GlazeConnection;

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn dial(&mut self) -> Result<GlazeConnection, IpcError> {
        let connecting = connect_async(self.endpoint.as_str());

        let (stream, _response) = timeout(self.connect_timeout, connecting)
            .await
            .map_err(|_| IpcError::ConnectTimeout {
                endpoint: self.endpoint.clone(),
                timeout: self.connect_timeout,
            })?
            .map_err(|e| IpcError::ConnectionFailed {
                endpoint: self.endpoint.clone(),
                source: e,
            })?;

        debug!("Connected to GlazeWM at {}", self.endpoint);

        Ok(GlazeConnection { stream })
    }
}

/// An open WebSocket connection to GlazeWM
#[derive(Debug)]
pub struct GlazeConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl EventConnection for GlazeConnection {
    async fn send_frame(&mut self, frame: OutboundFrame) -> Result<(), IpcError> {
        let text = frame.to_string();
        trace!("-> {}", text);
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(IpcError::SendFailed)
    }

    async fn next_frame(&mut self) -> Result<String, IpcError> {
        loop {
            let message = match self.stream.next().await {
                None => return Err(IpcError::ConnectionClosed),
                Some(Err(e)) => return Err(IpcError::ReceiveFailed(e)),
                Some(Ok(message)) => message,
            };

            match message {
                Message::Text(text) => return Ok(text),
                Message::Binary(bytes) => match String::from_utf8(bytes) {
                    Ok(text) => return Ok(text),
                    Err(_) => trace!("Skipping non UTF-8 binary frame"),
                },
                Message::Close(frame) => {
                    debug!(?frame, "GlazeWM closed the connection");
                    return Err(IpcError::ConnectionClosed);
                }
                // Pongs are queued by tungstenite itself
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    async fn close(&mut self) {
        match timeout(CLOSE_TIMEOUT, self.stream.close(None)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => trace!("Error while closing connection: {}", e),
            Err(_) => trace!("Close handshake timed out"),
        }
    }
}
