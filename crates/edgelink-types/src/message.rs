//! Wire message envelope (spec.md §4.2, §6).
//!
//! Every frame is a JSON object `{"type": "...", "payload": {...}}`. This
//! module defines that envelope as a single adjacently-tagged enum: `type`
//! becomes the variant name (snake_case) and `payload` its fields.

use serde::{Deserialize, Serialize};

use crate::clipboard::ClipboardContent;
use crate::event::{Modifiers, MouseButton};
use crate::peer::PeerId;
use crate::screen::{Screen, ScreenEdge};

/// Current protocol version, used to gate the handshake (spec.md §4.2, §7).
pub const PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion { major: 1, minor: 0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: u16,
    pub minor: u16,
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The full message taxonomy carried over the peer link (spec.md §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Message {
    Hello {
        version: ProtocolVersion,
        id: PeerId,
        name: String,
        platform: String,
        screens: Vec<Screen>,
    },
    Connected {
        version: ProtocolVersion,
        id: PeerId,
        name: String,
        platform: String,
        screens: Vec<Screen>,
    },
    Ping {},
    Pong {},
    Disconnect {},

    /// Enter/leave remote control; `edge` is the transfer edge crossed.
    ModeSwitch {
        active: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        screen: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        edge: Option<ScreenEdge>,
    },

    MouseMove {
        x: i32,
        y: i32,
        absolute: bool,
    },
    MouseButton {
        button: MouseButton,
        action: ButtonAction,
        x: i32,
        y: i32,
    },
    /// Integer "notches" × 120; positive `delta_y` is scroll up.
    MouseScroll {
        #[serde(rename = "deltaX")]
        delta_x: i32,
        #[serde(rename = "deltaY")]
        delta_y: i32,
    },
    Key {
        #[serde(rename = "keyCode")]
        key_code: i32,
        action: ButtonAction,
        modifiers: Modifiers,
    },

    ClipboardSync {
        content_type: crate::clipboard::ContentType,
        data: String,
    },

    /// Sent when local display config changes after the handshake.
    ScreenInfo {
        screens: Vec<Screen>,
    },
}

impl Message {
    #[must_use]
    pub fn clipboard_sync(content: ClipboardContent) -> Self {
        Self::ClipboardSync {
            content_type: content.content_type,
            data: content.data,
        }
    }
}

/// `"down"` / `"up"` action tag used by `mouse_button` and `key` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    Down,
    Up,
}

impl From<crate::event::ButtonState> for ButtonAction {
    fn from(state: crate::event::ButtonState) -> Self {
        match state {
            crate::event::ButtonState::Down => Self::Down,
            crate::event::ButtonState::Up => Self::Up,
        }
    }
}

impl From<ButtonAction> for crate::event::ButtonState {
    fn from(action: ButtonAction) -> Self {
        match action {
            ButtonAction::Down => Self::Down,
            ButtonAction::Up => Self::Up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreenOwner;

    fn screen() -> Screen {
        Screen {
            id: "primary".to_string(),
            name: "primary".to_string(),
            origin_x: 0,
            origin_y: 0,
            width: 1920,
            height: 1080,
            is_primary: true,
            owner: ScreenOwner::Local,
        }
    }

    fn roundtrip(msg: &Message) -> Message {
        let json = serde_json::to_string(msg).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn hello_wire_shape() {
        let msg = Message::Hello {
            version: PROTOCOL_VERSION,
            id: PeerId::new(),
            name: "left".to_string(),
            platform: "linux".to_string(),
            screens: vec![screen()],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "hello");
        assert!(json["payload"]["screens"].is_array());
        let _ = roundtrip(&msg);
    }

    #[test]
    fn ping_pong_roundtrip() {
        let _ = roundtrip(&Message::Ping {});
        let _ = roundtrip(&Message::Pong {});
    }

    #[test]
    fn mode_switch_enter_roundtrip() {
        let msg = Message::ModeSwitch {
            active: true,
            screen: Some(0),
            x: Some(50),
            y: Some(540),
            edge: Some(ScreenEdge::Right),
        };
        let decoded = roundtrip(&msg);
        match decoded {
            Message::ModeSwitch { active, x, y, .. } => {
                assert!(active);
                assert_eq!(x, Some(50));
                assert_eq!(y, Some(540));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn mode_switch_leave_omits_optionals() {
        let msg = Message::ModeSwitch {
            active: false,
            screen: None,
            x: None,
            y: None,
            edge: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json["payload"].get("screen").is_none());
    }

    #[test]
    fn mouse_scroll_uses_camel_case_fields() {
        let msg = Message::MouseScroll {
            delta_x: 0,
            delta_y: 120,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["payload"]["deltaY"], 120);
    }

    #[test]
    fn clipboard_sync_roundtrip() {
        let msg = Message::clipboard_sync(ClipboardContent::text("hello clipboard"));
        let decoded = roundtrip(&msg);
        match decoded {
            Message::ClipboardSync { data, .. } => assert_eq!(data, "hello clipboard"),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn protocol_version_display() {
        assert_eq!(PROTOCOL_VERSION.to_string(), "1.0");
    }
}
