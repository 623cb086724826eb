//! Bidirectional mapping between evdev keys and edgelink's neutral types.

use edgelink_types::{ButtonState, KeyCode, MouseButton};
use evdev::KeyCode as EvdevKey;

/// Convert an evdev `KeyCode` to our `KeyCode`.
#[allow(clippy::too_many_lines)]
pub fn evdev_key_to_keycode(key: EvdevKey) -> KeyCode {
    match key {
        EvdevKey::KEY_A => KeyCode::KeyA,
        EvdevKey::KEY_B => KeyCode::KeyB,
        EvdevKey::KEY_C => KeyCode::KeyC,
        EvdevKey::KEY_D => KeyCode::KeyD,
        EvdevKey::KEY_E => KeyCode::KeyE,
        EvdevKey::KEY_F => KeyCode::KeyF,
        EvdevKey::KEY_G => KeyCode::KeyG,
        EvdevKey::KEY_H => KeyCode::KeyH,
        EvdevKey::KEY_I => KeyCode::KeyI,
        EvdevKey::KEY_J => KeyCode::KeyJ,
        EvdevKey::KEY_K => KeyCode::KeyK,
        EvdevKey::KEY_L => KeyCode::KeyL,
        EvdevKey::KEY_M => KeyCode::KeyM,
        EvdevKey::KEY_N => KeyCode::KeyN,
        EvdevKey::KEY_O => KeyCode::KeyO,
        EvdevKey::KEY_P => KeyCode::KeyP,
        EvdevKey::KEY_Q => KeyCode::KeyQ,
        EvdevKey::KEY_R => KeyCode::KeyR,
        EvdevKey::KEY_S => KeyCode::KeyS,
        EvdevKey::KEY_T => KeyCode::KeyT,
        EvdevKey::KEY_U => KeyCode::KeyU,
        EvdevKey::KEY_V => KeyCode::KeyV,
        EvdevKey::KEY_W => KeyCode::KeyW,
        EvdevKey::KEY_X => KeyCode::KeyX,
        EvdevKey::KEY_Y => KeyCode::KeyY,
        EvdevKey::KEY_Z => KeyCode::KeyZ,

        EvdevKey::KEY_0 => KeyCode::Digit0,
        EvdevKey::KEY_1 => KeyCode::Digit1,
        EvdevKey::KEY_2 => KeyCode::Digit2,
        EvdevKey::KEY_3 => KeyCode::Digit3,
        EvdevKey::KEY_4 => KeyCode::Digit4,
        EvdevKey::KEY_5 => KeyCode::Digit5,
        EvdevKey::KEY_6 => KeyCode::Digit6,
        EvdevKey::KEY_7 => KeyCode::Digit7,
        EvdevKey::KEY_8 => KeyCode::Digit8,
        EvdevKey::KEY_9 => KeyCode::Digit9,

        EvdevKey::KEY_F1 => KeyCode::F1,
        EvdevKey::KEY_F2 => KeyCode::F2,
        EvdevKey::KEY_F3 => KeyCode::F3,
        EvdevKey::KEY_F4 => KeyCode::F4,
        EvdevKey::KEY_F5 => KeyCode::F5,
        EvdevKey::KEY_F6 => KeyCode::F6,
        EvdevKey::KEY_F7 => KeyCode::F7,
        EvdevKey::KEY_F8 => KeyCode::F8,
        EvdevKey::KEY_F9 => KeyCode::F9,
        EvdevKey::KEY_F10 => KeyCode::F10,
        EvdevKey::KEY_F11 => KeyCode::F11,
        EvdevKey::KEY_F12 => KeyCode::F12,

        EvdevKey::KEY_LEFTSHIFT => KeyCode::LeftShift,
        EvdevKey::KEY_RIGHTSHIFT => KeyCode::RightShift,
        EvdevKey::KEY_LEFTCTRL => KeyCode::LeftCtrl,
        EvdevKey::KEY_RIGHTCTRL => KeyCode::RightCtrl,
        EvdevKey::KEY_LEFTALT => KeyCode::LeftAlt,
        EvdevKey::KEY_RIGHTALT => KeyCode::RightAlt,
        EvdevKey::KEY_LEFTMETA => KeyCode::LeftMeta,
        EvdevKey::KEY_RIGHTMETA => KeyCode::RightMeta,

        EvdevKey::KEY_ENTER => KeyCode::Enter,
        EvdevKey::KEY_ESC => KeyCode::Escape,
        EvdevKey::KEY_BACKSPACE => KeyCode::Backspace,
        EvdevKey::KEY_TAB => KeyCode::Tab,
        EvdevKey::KEY_SPACE => KeyCode::Space,
        EvdevKey::KEY_CAPSLOCK => KeyCode::CapsLock,
        EvdevKey::KEY_INSERT => KeyCode::Insert,
        EvdevKey::KEY_DELETE => KeyCode::Delete,
        EvdevKey::KEY_HOME => KeyCode::Home,
        EvdevKey::KEY_END => KeyCode::End,
        EvdevKey::KEY_PAGEUP => KeyCode::PageUp,
        EvdevKey::KEY_PAGEDOWN => KeyCode::PageDown,
        EvdevKey::KEY_UP => KeyCode::ArrowUp,
        EvdevKey::KEY_DOWN => KeyCode::ArrowDown,
        EvdevKey::KEY_LEFT => KeyCode::ArrowLeft,
        EvdevKey::KEY_RIGHT => KeyCode::ArrowRight,

        EvdevKey::KEY_MINUS => KeyCode::Minus,
        EvdevKey::KEY_EQUAL => KeyCode::Equal,
        EvdevKey::KEY_LEFTBRACE => KeyCode::BracketLeft,
        EvdevKey::KEY_RIGHTBRACE => KeyCode::BracketRight,
        EvdevKey::KEY_BACKSLASH => KeyCode::Backslash,
        EvdevKey::KEY_SEMICOLON => KeyCode::Semicolon,
        EvdevKey::KEY_APOSTROPHE => KeyCode::Quote,
        EvdevKey::KEY_GRAVE => KeyCode::Backquote,
        EvdevKey::KEY_COMMA => KeyCode::Comma,
        EvdevKey::KEY_DOT => KeyCode::Period,
        EvdevKey::KEY_SLASH => KeyCode::Slash,

        other => KeyCode::Unknown(u32::from(other.0)),
    }
}

/// Convert our `KeyCode` to an evdev `KeyCode`.
#[allow(clippy::too_many_lines)]
pub fn keycode_to_evdev_key(code: KeyCode) -> EvdevKey {
    match code {
        KeyCode::KeyA => EvdevKey::KEY_A,
        KeyCode::KeyB => EvdevKey::KEY_B,
        KeyCode::KeyC => EvdevKey::KEY_C,
        KeyCode::KeyD => EvdevKey::KEY_D,
        KeyCode::KeyE => EvdevKey::KEY_E,
        KeyCode::KeyF => EvdevKey::KEY_F,
        KeyCode::KeyG => EvdevKey::KEY_G,
        KeyCode::KeyH => EvdevKey::KEY_H,
        KeyCode::KeyI => EvdevKey::KEY_I,
        KeyCode::KeyJ => EvdevKey::KEY_J,
        KeyCode::KeyK => EvdevKey::KEY_K,
        KeyCode::KeyL => EvdevKey::KEY_L,
        KeyCode::KeyM => EvdevKey::KEY_M,
        KeyCode::KeyN => EvdevKey::KEY_N,
        KeyCode::KeyO => EvdevKey::KEY_O,
        KeyCode::KeyP => EvdevKey::KEY_P,
        KeyCode::KeyQ => EvdevKey::KEY_Q,
        KeyCode::KeyR => EvdevKey::KEY_R,
        KeyCode::KeyS => EvdevKey::KEY_S,
        KeyCode::KeyT => EvdevKey::KEY_T,
        KeyCode::KeyU => EvdevKey::KEY_U,
        KeyCode::KeyV => EvdevKey::KEY_V,
        KeyCode::KeyW => EvdevKey::KEY_W,
        KeyCode::KeyX => EvdevKey::KEY_X,
        KeyCode::KeyY => EvdevKey::KEY_Y,
        KeyCode::KeyZ => EvdevKey::KEY_Z,

        KeyCode::Digit0 => EvdevKey::KEY_0,
        KeyCode::Digit1 => EvdevKey::KEY_1,
        KeyCode::Digit2 => EvdevKey::KEY_2,
        KeyCode::Digit3 => EvdevKey::KEY_3,
        KeyCode::Digit4 => EvdevKey::KEY_4,
        KeyCode::Digit5 => EvdevKey::KEY_5,
        KeyCode::Digit6 => EvdevKey::KEY_6,
        KeyCode::Digit7 => EvdevKey::KEY_7,
        KeyCode::Digit8 => EvdevKey::KEY_8,
        KeyCode::Digit9 => EvdevKey::KEY_9,

        KeyCode::F1 => EvdevKey::KEY_F1,
        KeyCode::F2 => EvdevKey::KEY_F2,
        KeyCode::F3 => EvdevKey::KEY_F3,
        KeyCode::F4 => EvdevKey::KEY_F4,
        KeyCode::F5 => EvdevKey::KEY_F5,
        KeyCode::F6 => EvdevKey::KEY_F6,
        KeyCode::F7 => EvdevKey::KEY_F7,
        KeyCode::F8 => EvdevKey::KEY_F8,
        KeyCode::F9 => EvdevKey::KEY_F9,
        KeyCode::F10 => EvdevKey::KEY_F10,
        KeyCode::F11 => EvdevKey::KEY_F11,
        KeyCode::F12 => EvdevKey::KEY_F12,

        KeyCode::LeftShift => EvdevKey::KEY_LEFTSHIFT,
        KeyCode::RightShift => EvdevKey::KEY_RIGHTSHIFT,
        KeyCode::LeftCtrl => EvdevKey::KEY_LEFTCTRL,
        KeyCode::RightCtrl => EvdevKey::KEY_RIGHTCTRL,
        KeyCode::LeftAlt => EvdevKey::KEY_LEFTALT,
        KeyCode::RightAlt => EvdevKey::KEY_RIGHTALT,
        KeyCode::LeftMeta => EvdevKey::KEY_LEFTMETA,
        KeyCode::RightMeta => EvdevKey::KEY_RIGHTMETA,

        KeyCode::Enter => EvdevKey::KEY_ENTER,
        KeyCode::Escape => EvdevKey::KEY_ESC,
        KeyCode::Backspace => EvdevKey::KEY_BACKSPACE,
        KeyCode::Tab => EvdevKey::KEY_TAB,
        KeyCode::Space => EvdevKey::KEY_SPACE,
        KeyCode::CapsLock => EvdevKey::KEY_CAPSLOCK,
        KeyCode::Insert => EvdevKey::KEY_INSERT,
        KeyCode::Delete => EvdevKey::KEY_DELETE,
        KeyCode::Home => EvdevKey::KEY_HOME,
        KeyCode::End => EvdevKey::KEY_END,
        KeyCode::PageUp => EvdevKey::KEY_PAGEUP,
        KeyCode::PageDown => EvdevKey::KEY_PAGEDOWN,
        KeyCode::ArrowUp => EvdevKey::KEY_UP,
        KeyCode::ArrowDown => EvdevKey::KEY_DOWN,
        KeyCode::ArrowLeft => EvdevKey::KEY_LEFT,
        KeyCode::ArrowRight => EvdevKey::KEY_RIGHT,

        KeyCode::Minus => EvdevKey::KEY_MINUS,
        KeyCode::Equal => EvdevKey::KEY_EQUAL,
        KeyCode::BracketLeft => EvdevKey::KEY_LEFTBRACE,
        KeyCode::BracketRight => EvdevKey::KEY_RIGHTBRACE,
        KeyCode::Backslash => EvdevKey::KEY_BACKSLASH,
        KeyCode::Semicolon => EvdevKey::KEY_SEMICOLON,
        KeyCode::Quote => EvdevKey::KEY_APOSTROPHE,
        KeyCode::Backquote => EvdevKey::KEY_GRAVE,
        KeyCode::Comma => EvdevKey::KEY_COMMA,
        KeyCode::Period => EvdevKey::KEY_DOT,
        KeyCode::Slash => EvdevKey::KEY_SLASH,

        #[allow(clippy::cast_possible_truncation)]
        KeyCode::Unknown(raw) => EvdevKey(raw as u16),
    }
}

/// Try to convert an evdev `KeyCode` in the `BTN_*` range to a `MouseButton`.
pub fn evdev_key_to_mouse_button(key: EvdevKey) -> Option<MouseButton> {
    match key {
        EvdevKey::BTN_LEFT => Some(MouseButton::Left),
        EvdevKey::BTN_RIGHT => Some(MouseButton::Right),
        EvdevKey::BTN_MIDDLE => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Convert a `MouseButton` to an evdev `KeyCode`.
pub fn mouse_button_to_evdev_key(button: MouseButton) -> EvdevKey {
    match button {
        MouseButton::Left => EvdevKey::BTN_LEFT,
        MouseButton::Right => EvdevKey::BTN_RIGHT,
        MouseButton::Middle => EvdevKey::BTN_MIDDLE,
    }
}

/// Convert an evdev event value (0=released, 1=pressed, 2=repeat) to `ButtonState`.
pub fn evdev_value_to_button_state(value: i32) -> Option<ButtonState> {
    match value {
        0 => Some(ButtonState::Up),
        1 | 2 => Some(ButtonState::Down),
        _ => None,
    }
}

/// Convert a `ButtonState` to an evdev event value.
pub fn button_state_to_evdev_value(state: ButtonState) -> i32 {
    match state {
        ButtonState::Down => 1,
        ButtonState::Up => 0,
    }
}
