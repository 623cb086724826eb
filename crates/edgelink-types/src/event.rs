//! Platform-neutral input event types (spec.md §4.8 "Key Mapping" and §6).

use serde::{Deserialize, Serialize};

/// Press/release state shared by keys and mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonState {
    Down,
    Up,
}

/// Mouse button identifier. The wire only carries these three (spec.md §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Which modifier keys the engine believes are currently held.
///
/// Authoritative for interpreting the return hotkey (spec.md §3 "Modifier Set").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Apply a key event's effect on this modifier set, if `code` is a modifier key.
    pub fn apply(&mut self, code: KeyCode, state: ButtonState) {
        let held = state == ButtonState::Down;
        match code {
            KeyCode::LeftCtrl | KeyCode::RightCtrl => self.ctrl = held,
            KeyCode::LeftAlt | KeyCode::RightAlt => self.alt = held,
            KeyCode::LeftShift | KeyCode::RightShift => self.shift = held,
            KeyCode::LeftMeta | KeyCode::RightMeta => self.meta = held,
            _ => {}
        }
    }

    /// Whether any modifier is currently held.
    #[must_use]
    pub fn any_held(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.meta
    }

    /// The set of currently-held modifier keys, each represented once
    /// (left variant), for synthesising release events.
    #[must_use]
    pub fn held_keys(&self) -> Vec<KeyCode> {
        let mut keys = Vec::new();
        if self.ctrl {
            keys.push(KeyCode::LeftCtrl);
        }
        if self.alt {
            keys.push(KeyCode::LeftAlt);
        }
        if self.shift {
            keys.push(KeyCode::LeftShift);
        }
        if self.meta {
            keys.push(KeyCode::LeftMeta);
        }
        keys
    }
}

/// A platform-neutral key code.
///
/// Each host translates its native scancodes into this space for outgoing
/// events and back for incoming ones (spec.md §4.8). The wire transports
/// the VK-style integer form (see [`crate::vk`]), never this enum directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,

    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
    LeftMeta,
    RightMeta,

    Enter,
    Escape,
    Backspace,
    Tab,
    Space,
    CapsLock,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Minus,
    Equal,
    BracketLeft,
    BracketRight,
    Backslash,
    Semicolon,
    Quote,
    Backquote,
    Comma,
    Period,
    Slash,

    /// Fallback for unmapped native scancodes, carried through unchanged.
    Unknown(u32),
}

/// A platform-agnostic input event, as captured locally or synthesised remotely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Key {
        code: KeyCode,
        state: ButtonState,
    },
    /// Pointer motion. `absolute` distinguishes a `Remote`-mode position
    /// update from a `Controlled`-mode replay of the sender's own delta.
    MouseMove {
        x: i32,
        y: i32,
        absolute: bool,
    },
    MouseButton {
        button: MouseButton,
        state: ButtonState,
        x: i32,
        y: i32,
    },
    /// Scroll notches, 120 units per notch; positive `delta_y` is scroll up.
    Scroll {
        delta_x: i32,
        delta_y: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_apply_tracks_held_state() {
        let mut m = Modifiers::default();
        m.apply(KeyCode::LeftCtrl, ButtonState::Down);
        assert!(m.ctrl);
        assert!(m.any_held());
        m.apply(KeyCode::LeftCtrl, ButtonState::Up);
        assert!(!m.ctrl);
        assert!(!m.any_held());
    }

    #[test]
    fn modifiers_ignore_non_modifier_keys() {
        let mut m = Modifiers::default();
        m.apply(KeyCode::KeyA, ButtonState::Down);
        assert!(!m.any_held());
    }

    #[test]
    fn held_keys_lists_each_held_modifier_once() {
        let mut m = Modifiers::default();
        m.apply(KeyCode::LeftCtrl, ButtonState::Down);
        m.apply(KeyCode::RightAlt, ButtonState::Down);
        let held = m.held_keys();
        assert_eq!(held.len(), 2);
        assert!(held.contains(&KeyCode::LeftCtrl));
        assert!(held.contains(&KeyCode::LeftAlt));
    }

    #[test]
    fn input_event_key_roundtrip() {
        let event = InputEvent::Key {
            code: KeyCode::KeyA,
            state: ButtonState::Down,
        };
        let json = serde_json::to_string(&event).unwrap();
        let decoded: InputEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn unknown_keycode_roundtrip() {
        let event = InputEvent::Key {
            code: KeyCode::Unknown(0xDEAD),
            state: ButtonState::Down,
        };
        let json = serde_json::to_string(&event).unwrap();
        let decoded: InputEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, decoded);
    }
}
