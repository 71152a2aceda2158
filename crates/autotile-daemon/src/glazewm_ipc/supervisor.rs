//! Connection supervisor
//!
//! Owns the connection lifecycle against the GlazeWM IPC server:
//!
//! ```text
//! Disconnected -> Connecting -> Subscribed -> Receiving
//!       ^                                        |
//!       +------------ any connection error ------+
//!
//! Receiving --application_exiting--> Exited
//! ```
//!
//! ## Retry policy
//!
//! - Every failed attempt (dial, subscribe, read, or command write) is
//!   logged and followed by a fixed delay before the next dial
//! - There is no attempt limit: GlazeWM restarts are expected, and the
//!   autotiler must pick up again once the server is back
//! - Only `application_exiting` ends the loop
//!
//! Messages are handled strictly in arrival order on a single task. Each
//! frame is decoded and answered before the next one is read.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use super::client::{Dialer, EventConnection};
use super::events::{react, Reaction};
use super::types::OutboundFrame;
use super::IpcError;

/// Lifecycle state of the supervised connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Subscribed,
    Receiving,
    Exited,
}

/// Why [`Supervisor::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// GlazeWM announced it is shutting down
    ApplicationExiting,
}

/// Keeps one connection to GlazeWM alive and reacts to its events
#[derive(Debug)]
pub struct Supervisor<D> {
    dialer: D,
    retry_delay: Duration,
    state: ConnectionState,
    /// Failed attempts since the last successful subscription
    consecutive_failures: u32,
}

impl<D: Dialer> Supervisor<D> {
    pub fn new(dialer: D, retry_delay: Duration) -> Self {
        Self {
            dialer,
            retry_delay,
            state: ConnectionState::Disconnected,
            consecutive_failures: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Run until GlazeWM signals it is exiting
    ///
    /// Connection errors never escape: they are logged and the whole
    /// dial/subscribe/receive cycle restarts after the retry delay.
    pub async fn run(&mut self) -> ExitReason {
        loop {
            match self.run_connection().await {
                Ok(reason) => {
                    self.transition(ConnectionState::Exited);
                    return reason;
                }
                Err(e) => {
                    self.record_failure();
                    self.transition(ConnectionState::Disconnected);
                    warn!(
                        endpoint = self.dialer.endpoint(),
                        attempt = self.consecutive_failures,
                        retry_delay_ms = self.retry_delay.as_millis() as u64,
                        "Socket error: {}. Retrying...",
                        e
                    );
                    sleep(self.retry_delay).await;
                }
            }
        }
    }

    /// One connection attempt, from dial to teardown
    async fn run_connection(&mut self) -> Result<ExitReason, IpcError> {
        self.transition(ConnectionState::Connecting);
        let mut connection = self.dialer.dial().await?;

        let result = self.drive(&mut connection).await;

        // Released on every path, including shutdown
        connection.close().await;
        result
    }

    async fn drive(&mut self, connection: &mut D::Connection) -> Result<ExitReason, IpcError> {
        for frame in OutboundFrame::subscriptions() {
            connection.send_frame(frame).await?;
        }
        self.transition(ConnectionState::Subscribed);

        if self.consecutive_failures > 0 {
            info!(
                "Connected to GlazeWM at {} after {} failed attempt(s)",
                self.dialer.endpoint(),
                self.consecutive_failures
            );
        } else {
            info!("Connected to GlazeWM at {}", self.dialer.endpoint());
        }
        self.consecutive_failures = 0;

        self.transition(ConnectionState::Receiving);
        loop {
            let raw = connection.next_frame().await?;

            match react(&raw) {
                Reaction::Exit => {
                    info!("GlazeWM is exiting, shutting down");
                    return Ok(ExitReason::ApplicationExiting);
                }
                Reaction::SetTilingDirection(direction) => {
                    debug!(%direction, "Setting tiling direction");
                    connection
                        .send_frame(OutboundFrame::SetTilingDirection(direction))
                        .await?;
                }
                Reaction::Ignore(reason) => {
                    trace!(%reason, "No command for frame");
                }
            }
        }
    }

    fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    fn transition(&mut self, next: ConnectionState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "Connection state changed");
            self.state = next;
        }
    }
}
