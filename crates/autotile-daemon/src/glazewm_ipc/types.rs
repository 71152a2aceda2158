//! Wire types for GlazeWM IPC messages
//!
//! GlazeWM pushes JSON frames shaped like:
//!
//! ```text
//! {
//!   "messageType": "event_subscription",
//!   "data": {
//!     "eventType": "focus_changed",
//!     "focusedContainer": { "type": "window", "hasFocus": true, ... }
//!   },
//!   ...
//! }
//! ```
//!
//! Only the fields the autotiler needs are modelled. Decoding is lenient in
//! the same way GlazeWM's own clients are: missing or `null` fields take their
//! zero value instead of failing the whole frame.

use serde::{Deserialize, Deserializer};

use super::IpcError;

/// Event types the autotiler subscribes to, in subscription order
pub const SUBSCRIBED_TOPICS: [EventType; 3] = [
    EventType::FocusChanged,
    EventType::FocusedContainerMoved,
    EventType::ApplicationExiting,
];

/// The `data.eventType` tag of an inbound frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    FocusChanged,
    FocusedContainerMoved,
    ApplicationExiting,
    /// Any tag we did not subscribe to, including subscription acks
    #[default]
    #[serde(other)]
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FocusChanged => "focus_changed",
            Self::FocusedContainerMoved => "focused_container_moved",
            Self::ApplicationExiting => "application_exiting",
            Self::Other => "other",
        }
    }

    /// Events that carry a `focusedContainer` worth inspecting
    pub fn is_focus_relevant(&self) -> bool {
        matches!(self, Self::FocusChanged | Self::FocusedContainerMoved)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded `data` object of an inbound frame
///
/// The container payload is kept as raw JSON and only decoded for the
/// focus-relevant event types.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_type: EventType,

    #[serde(default)]
    pub focused_container: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    data: EventEnvelope,
}

impl EventEnvelope {
    /// Decode one inbound text frame
    pub fn decode(raw: &str) -> Result<Self, IpcError> {
        let message: WireMessage =
            serde_json::from_str(raw).map_err(IpcError::DeserializeFailed)?;
        Ok(message.data)
    }

    /// Decode the `focusedContainer` payload
    ///
    /// Returns `Ok(None)` when the payload is absent or `null`.
    pub fn focused_container(&self) -> Result<Option<ContainerNode>, IpcError> {
        match &self.focused_container {
            None => Ok(None),
            Some(value) => ContainerNode::deserialize(value)
                .map(Some)
                .map_err(IpcError::DeserializeFailed),
        }
    }
}

/// Kind of a node in GlazeWM's layout tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Root,
    Monitor,
    Workspace,
    Split,
    Window,
    #[default]
    #[serde(other)]
    Other,
}

/// A node of the container tree snapshot attached to focus events
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerNode {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: ContainerKind,

    #[serde(deserialize_with = "null_as_default")]
    pub has_focus: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub width: f64,

    #[serde(deserialize_with = "null_as_default")]
    pub height: f64,

    #[serde(deserialize_with = "children_or_empty")]
    pub children: Vec<ContainerNode>,
}

impl ContainerNode {
    /// A window node carries input focus
    pub fn is_focused_window(&self) -> bool {
        self.kind == ContainerKind::Window && self.has_focus
    }

    /// Find the focused window, depth-first in pre-order
    ///
    /// The node itself is tested before its children, and children are
    /// visited in order. The first match wins; `None` is a normal state
    /// during focus transitions.
    pub fn find_focused(&self) -> Option<&ContainerNode> {
        if self.is_focused_window() {
            return Some(self);
        }
        self.children.iter().find_map(ContainerNode::find_focused)
    }
}

/// Tiling direction for the next window placed in a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilingDirection {
    Horizontal,
    Vertical,
}

impl TilingDirection {
    /// Pick a direction from a window's on-screen extent
    ///
    /// Wider-than-tall windows split horizontally, everything else
    /// (including squares) vertically. A window that has not been measured
    /// yet (any non-positive side) yields no decision.
    pub fn from_extent(width: f64, height: f64) -> Option<Self> {
        if !(width > 0.0 && height > 0.0) {
            return None;
        }

        if width > height {
            Some(Self::Horizontal)
        } else {
            Some(Self::Vertical)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl std::fmt::Display for TilingDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text frames the autotiler sends to GlazeWM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundFrame {
    /// `sub -e <topic>`
    Subscribe(EventType),
    /// `command set-tiling-direction <direction>`
    SetTilingDirection(TilingDirection),
}

impl OutboundFrame {
    /// Subscription frames in the order they are sent after connecting
    pub fn subscriptions() -> impl Iterator<Item = OutboundFrame> {
        SUBSCRIBED_TOPICS.into_iter().map(OutboundFrame::Subscribe)
    }
}

impl std::fmt::Display for OutboundFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Subscribe(topic) => write!(f, "sub -e {}", topic),
            Self::SetTilingDirection(direction) => {
                write!(f, "command set-tiling-direction {}", direction)
            }
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// `null` list becomes empty, `null` elements become zero-value nodes
fn children_or_empty<'de, D>(deserializer: D) -> Result<Vec<ContainerNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let children: Option<Vec<Option<ContainerNode>>> = Option::deserialize(deserializer)?;
    Ok(children
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(has_focus: bool, width: f64, height: f64) -> ContainerNode {
        ContainerNode {
            kind: ContainerKind::Window,
            has_focus,
            width,
            height,
            children: Vec::new(),
        }
    }

    fn split(children: Vec<ContainerNode>) -> ContainerNode {
        ContainerNode {
            kind: ContainerKind::Split,
            children,
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_focus_changed_envelope() {
        let raw = r#"{
            "messageType": "event_subscription",
            "subscriptionId": "0f5d",
            "success": true,
            "data": {
                "eventType": "focus_changed",
                "focusedContainer": {"type": "window", "hasFocus": true, "width": 800, "height": 600}
            }
        }"#;

        let envelope = EventEnvelope::decode(raw).unwrap();
        assert_eq!(envelope.event_type, EventType::FocusChanged);

        let container = envelope.focused_container().unwrap().unwrap();
        assert_eq!(container, window(true, 800.0, 600.0));
    }

    #[test]
    fn test_decode_unknown_event_type() {
        let raw = r#"{"data": {"eventType": "workspace_activated"}}"#;
        let envelope = EventEnvelope::decode(raw).unwrap();
        assert_eq!(envelope.event_type, EventType::Other);
        assert!(envelope.focused_container().unwrap().is_none());
    }

    #[test]
    fn test_decode_subscription_ack_is_other() {
        // Replies to `sub -e ...` carry a subscription id and no event type
        let raw = r#"{"messageType": "client_response", "clientMessage": "sub -e focus_changed",
                      "data": {"subscriptionId": "abc"}, "success": true}"#;
        let envelope = EventEnvelope::decode(raw).unwrap();
        assert_eq!(envelope.event_type, EventType::Other);
    }

    #[test]
    fn test_decode_missing_data() {
        let envelope = EventEnvelope::decode("{}").unwrap();
        assert_eq!(envelope, EventEnvelope::default());
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let err = EventEnvelope::decode("{\"data\": ").unwrap_err();
        assert!(matches!(err, IpcError::DeserializeFailed(_)));
        assert!(!err.is_connection_error());
    }

    #[test]
    fn test_null_focused_container_is_absent() {
        let raw = r#"{"data": {"eventType": "focus_changed", "focusedContainer": null}}"#;
        let envelope = EventEnvelope::decode(raw).unwrap();
        assert!(envelope.focused_container().unwrap().is_none());
    }

    #[test]
    fn test_malformed_container_is_decode_error() {
        let raw = r#"{"data": {"eventType": "focus_changed", "focusedContainer": {"width": "wide"}}}"#;
        let envelope = EventEnvelope::decode(raw).unwrap();
        assert!(matches!(
            envelope.focused_container(),
            Err(IpcError::DeserializeFailed(_))
        ));
    }

    #[test]
    fn test_container_lenient_fields() {
        let value = serde_json::json!({
            "type": "split",
            "hasFocus": null,
            "children": null,
            "tilingDirection": "horizontal",
            "id": "e6b9"
        });
        let node = ContainerNode::deserialize(&value).unwrap();
        assert_eq!(node.kind, ContainerKind::Split);
        assert!(!node.has_focus);
        assert_eq!(node.width, 0.0);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_null_child_does_not_hide_siblings() {
        let value = serde_json::json!({
            "type": "split",
            "children": [
                null,
                {"type": "window", "hasFocus": true, "width": 30, "height": 10}
            ]
        });
        let node = ContainerNode::deserialize(&value).unwrap();
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0], ContainerNode::default());
        assert_eq!(node.find_focused(), Some(&window(true, 30.0, 10.0)));
    }

    #[test]
    fn test_container_unknown_kind() {
        let value = serde_json::json!({"type": "container"});
        let node = ContainerNode::deserialize(&value).unwrap();
        assert_eq!(node.kind, ContainerKind::Other);
    }

    #[test]
    fn test_find_focused_returns_none_without_focus() {
        let tree = split(vec![window(false, 10.0, 20.0), window(false, 30.0, 10.0)]);
        assert!(tree.find_focused().is_none());
    }

    #[test]
    fn test_find_focused_ignores_focused_non_window() {
        let mut tree = split(vec![window(false, 10.0, 20.0)]);
        tree.has_focus = true;
        assert!(tree.find_focused().is_none());
    }

    #[test]
    fn test_find_focused_root_window() {
        let node = window(true, 5.0, 5.0);
        assert_eq!(node.find_focused(), Some(&node));
    }

    #[test]
    fn test_find_focused_nested() {
        let target = window(true, 30.0, 10.0);
        let tree = split(vec![
            window(false, 10.0, 20.0),
            split(vec![window(false, 1.0, 1.0), split(vec![target.clone()])]),
        ]);
        assert_eq!(tree.find_focused(), Some(&target));
    }

    #[test]
    fn test_find_focused_is_pre_order_first_match() {
        // Malformed snapshot with two focused windows: the earlier one in
        // pre-order wins, even when it is deeper in the tree.
        let deep = window(true, 1.0, 2.0);
        let shallow = window(true, 3.0, 4.0);
        let tree = split(vec![split(vec![deep.clone()]), shallow]);
        assert_eq!(tree.find_focused(), Some(&deep));
    }

    #[test]
    fn test_direction_from_extent() {
        assert_eq!(TilingDirection::from_extent(30.0, 10.0), Some(TilingDirection::Horizontal));
        assert_eq!(TilingDirection::from_extent(10.0, 30.0), Some(TilingDirection::Vertical));
        assert_eq!(TilingDirection::from_extent(10.5, 10.0), Some(TilingDirection::Horizontal));
    }

    #[test]
    fn test_direction_square_is_vertical() {
        assert_eq!(TilingDirection::from_extent(700.0, 700.0), Some(TilingDirection::Vertical));
    }

    #[test]
    fn test_direction_requires_positive_extent() {
        assert_eq!(TilingDirection::from_extent(0.0, 5.0), None);
        assert_eq!(TilingDirection::from_extent(5.0, 0.0), None);
        assert_eq!(TilingDirection::from_extent(-10.0, 5.0), None);
        assert_eq!(TilingDirection::from_extent(5.0, -1.0), None);
        assert_eq!(TilingDirection::from_extent(f64::NAN, 5.0), None);
    }

    #[test]
    fn test_subscription_frames_in_order() {
        let frames: Vec<String> = OutboundFrame::subscriptions().map(|f| f.to_string()).collect();
        assert_eq!(
            frames,
            vec![
                "sub -e focus_changed",
                "sub -e focused_container_moved",
                "sub -e application_exiting",
            ]
        );
    }

    #[test]
    fn test_command_frames() {
        assert_eq!(
            OutboundFrame::SetTilingDirection(TilingDirection::Horizontal).to_string(),
            "command set-tiling-direction horizontal"
        );
        assert_eq!(
            OutboundFrame::SetTilingDirection(TilingDirection::Vertical).to_string(),
            "command set-tiling-direction vertical"
        );
    }
}
