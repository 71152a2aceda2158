//! GlazeWM IPC client for the autotiler
//!
//! This module connects to GlazeWM's WebSocket IPC server, subscribes to
//! focus events, and answers each one with a tiling-direction command that
//! matches the focused window's shape.
//!
//! ## Architecture
//!
//! - `types`: wire types (`EventEnvelope`, `ContainerNode`, `OutboundFrame`)
//! - `events`: pure decision logic, one inbound frame to one `Reaction`
//! - `client`: `Dialer` / `EventConnection` seams and the WebSocket transport
//! - `supervisor`: connect, subscribe, receive, reconnect
//!
//! ## Protocol
//!
//! Clients send plain text commands (`sub -e <event>`,
//! `command <wm command>`); GlazeWM pushes JSON frames with the event in
//! `data.eventType` and, for focus events, the focused subtree in
//! `data.focusedContainer`.

mod client;
mod error;
mod events;
mod supervisor;
mod types;

pub use client::{Dialer, EventConnection, GlazeConnection, GlazeDialer};
pub use error::IpcError;
pub use events::{react, react_to_envelope, IgnoreReason, Reaction};
pub use supervisor::{ConnectionState, ExitReason, Supervisor};
pub use types::{
    ContainerKind, ContainerNode, EventEnvelope, EventType, OutboundFrame, TilingDirection,
    SUBSCRIBED_TOPICS,
};
