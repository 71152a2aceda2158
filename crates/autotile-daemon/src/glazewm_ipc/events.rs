//! Event reaction logic
//!
//! Turns one inbound GlazeWM frame into a [`Reaction`]. This is the only
//! place that inspects the event type, so the decision to shut down and the
//! decision to retile live side by side.
//!
//! ## Flow
//!
//! ```text
//! raw frame --decode--> EventEnvelope
//!     application_exiting            -> Reaction::Exit
//!     focus_changed /
//!     focused_container_moved        -> decode tree -> find focused window
//!                                       -> TilingDirection::from_extent
//!                                       -> Reaction::SetTilingDirection
//!     anything else                  -> Reaction::Ignore
//! ```
//!
//! Malformed frames never escalate: they become `Ignore` so a single bad
//! message cannot take the connection down.

use tracing::trace;

use super::types::{EventEnvelope, EventType, TilingDirection};

/// What the supervisor should do with one inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// GlazeWM is shutting down; stop for good
    Exit,
    /// Send `command set-tiling-direction <direction>`
    SetTilingDirection(TilingDirection),
    /// Nothing to do
    Ignore(IgnoreReason),
}

/// Why a frame produced no command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The frame was not valid JSON or not an event envelope
    Undecodable,
    /// The container payload could not be decoded
    UndecodableContainer,
    /// Not one of the focus events
    UnhandledEvent(EventType),
    /// No window in the snapshot has focus
    NoFocusedWindow,
    /// The focused window has a non-positive width or height
    Unmeasured,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undecodable => f.write_str("message could not be decoded"),
            Self::UndecodableContainer => f.write_str("focused container could not be decoded"),
            Self::UnhandledEvent(event_type) => write!(f, "event type {} is not handled", event_type),
            Self::NoFocusedWindow => f.write_str("no focused window in the snapshot"),
            Self::Unmeasured => f.write_str("focused window has no on-screen extent yet"),
        }
    }
}

/// Decide how to react to one raw inbound frame
pub fn react(raw: &str) -> Reaction {
    let envelope = match EventEnvelope::decode(raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            trace!("Discarding undecodable frame: {}", e);
            return Reaction::Ignore(IgnoreReason::Undecodable);
        }
    };

    react_to_envelope(&envelope)
}

/// Decide how to react to an already decoded envelope
pub fn react_to_envelope(envelope: &EventEnvelope) -> Reaction {
    match envelope.event_type {
        EventType::ApplicationExiting => Reaction::Exit,
        event_type if event_type.is_focus_relevant() => focus_reaction(envelope),
        other => Reaction::Ignore(IgnoreReason::UnhandledEvent(other)),
    }
}

fn focus_reaction(envelope: &EventEnvelope) -> Reaction {
    let root = match envelope.focused_container() {
        Ok(Some(root)) => root,
        Ok(None) => return Reaction::Ignore(IgnoreReason::NoFocusedWindow),
        Err(e) => {
            trace!(event = %envelope.event_type, "Discarding undecodable container: {}", e);
            return Reaction::Ignore(IgnoreReason::UndecodableContainer);
        }
    };

    let Some(focused) = root.find_focused() else {
        return Reaction::Ignore(IgnoreReason::NoFocusedWindow);
    };

    match TilingDirection::from_extent(focused.width, focused.height) {
        Some(direction) => Reaction::SetTilingDirection(direction),
        None => Reaction::Ignore(IgnoreReason::Unmeasured),
    }
}
