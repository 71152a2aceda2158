//! Error types for GlazeWM IPC operations

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the GlazeWM IPC server
///
/// Everything except `DeserializeFailed` is a connection-level failure and
/// makes the supervisor tear the socket down and retry.
#[derive(Debug, Error)]
pub enum IpcError {
    /// The configured endpoint is not a plain `ws://` URL
    #[error("Invalid GlazeWM endpoint {endpoint} (expected ws://host:port): {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Failed to connect to the IPC server
    #[error("Failed to connect to GlazeWM at {endpoint}: {source}")]
    ConnectionFailed {
        endpoint: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    /// Dial and handshake did not finish in time
    #[error("Timed out connecting to GlazeWM at {endpoint} after {timeout:?}")]
    ConnectTimeout { endpoint: String, timeout: Duration },

    /// Failed to send a frame to GlazeWM
    #[error("Failed to send frame to GlazeWM: {0}")]
    SendFailed(#[source] tokio_tungstenite::tungstenite::Error),

    /// Failed to receive a frame from GlazeWM
    #[error("Failed to receive frame from GlazeWM: {0}")]
    ReceiveFailed(#[source] tokio_tungstenite::tungstenite::Error),

    /// Failed to deserialize an inbound frame
    #[error("Failed to deserialize GlazeWM message: {0}")]
    DeserializeFailed(#[source] serde_json::Error),

    /// Connection was closed by GlazeWM
    #[error("Connection to GlazeWM closed")]
    ConnectionClosed,
}

impl IpcError {
    /// Whether this error ends the current connection attempt
    pub fn is_connection_error(&self) -> bool {
        !matches!(self, IpcError::DeserializeFailed(_))
    }
}
