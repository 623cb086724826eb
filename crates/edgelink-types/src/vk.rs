//! The neutral wire key-code space.
//!
//! spec.md §4.8: "integer codes following the traditional Windows VK
//! convention (letters = uppercase ASCII; function keys 112–123; arrows
//! 37/38/39/40; etc.)". [`KeyCode`] is the engine-internal neutral
//! keyspace; this module is the bijection between it and those wire
//! integers. Each host's capture/emulation backend holds its own
//! bijection between *native* scancodes and [`KeyCode`] (see
//! `edgelink-input::linux::keymap`); only the VK integer crosses the wire.

use crate::event::KeyCode;

/// Convert a neutral [`KeyCode`] to its wire-level VK-style integer.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn to_vk(code: KeyCode) -> i32 {
    match code {
        KeyCode::KeyA => 0x41,
        KeyCode::KeyB => 0x42,
        KeyCode::KeyC => 0x43,
        KeyCode::KeyD => 0x44,
        KeyCode::KeyE => 0x45,
        KeyCode::KeyF => 0x46,
        KeyCode::KeyG => 0x47,
        KeyCode::KeyH => 0x48,
        KeyCode::KeyI => 0x49,
        KeyCode::KeyJ => 0x4A,
        KeyCode::KeyK => 0x4B,
        KeyCode::KeyL => 0x4C,
        KeyCode::KeyM => 0x4D,
        KeyCode::KeyN => 0x4E,
        KeyCode::KeyO => 0x4F,
        KeyCode::KeyP => 0x50,
        KeyCode::KeyQ => 0x51,
        KeyCode::KeyR => 0x52,
        KeyCode::KeyS => 0x53,
        KeyCode::KeyT => 0x54,
        KeyCode::KeyU => 0x55,
        KeyCode::KeyV => 0x56,
        KeyCode::KeyW => 0x57,
        KeyCode::KeyX => 0x58,
        KeyCode::KeyY => 0x59,
        KeyCode::KeyZ => 0x5A,

        KeyCode::Digit0 => 0x30,
        KeyCode::Digit1 => 0x31,
        KeyCode::Digit2 => 0x32,
        KeyCode::Digit3 => 0x33,
        KeyCode::Digit4 => 0x34,
        KeyCode::Digit5 => 0x35,
        KeyCode::Digit6 => 0x36,
        KeyCode::Digit7 => 0x37,
        KeyCode::Digit8 => 0x38,
        KeyCode::Digit9 => 0x39,

        KeyCode::F1 => 112,
        KeyCode::F2 => 113,
        KeyCode::F3 => 114,
        KeyCode::F4 => 115,
        KeyCode::F5 => 116,
        KeyCode::F6 => 117,
        KeyCode::F7 => 118,
        KeyCode::F8 => 119,
        KeyCode::F9 => 120,
        KeyCode::F10 => 121,
        KeyCode::F11 => 122,
        KeyCode::F12 => 123,

        KeyCode::LeftShift => 0xA0,
        KeyCode::RightShift => 0xA1,
        KeyCode::LeftCtrl => 0xA2,
        KeyCode::RightCtrl => 0xA3,
        KeyCode::LeftAlt => 0xA4,
        KeyCode::RightAlt => 0xA5,
        KeyCode::LeftMeta => 0x5B,
        KeyCode::RightMeta => 0x5C,

        KeyCode::Enter => 0x0D,
        KeyCode::Escape => 0x1B,
        KeyCode::Backspace => 0x08,
        KeyCode::Tab => 0x09,
        KeyCode::Space => 0x20,
        KeyCode::CapsLock => 0x14,

        KeyCode::Insert => 0x2D,
        KeyCode::Delete => 0x2E,
        KeyCode::Home => 0x24,
        KeyCode::End => 0x23,
        KeyCode::PageUp => 0x21,
        KeyCode::PageDown => 0x22,
        KeyCode::ArrowUp => 38,
        KeyCode::ArrowDown => 40,
        KeyCode::ArrowLeft => 37,
        KeyCode::ArrowRight => 39,

        KeyCode::Minus => 0xBD,
        KeyCode::Equal => 0xBB,
        KeyCode::BracketLeft => 0xDB,
        KeyCode::BracketRight => 0xDD,
        KeyCode::Backslash => 0xDC,
        KeyCode::Semicolon => 0xBA,
        KeyCode::Quote => 0xDE,
        KeyCode::Backquote => 0xC0,
        KeyCode::Comma => 0xBC,
        KeyCode::Period => 0xBE,
        KeyCode::Slash => 0xBF,

        KeyCode::Unknown(raw) => -i32::try_from(raw).unwrap_or(i32::MIN),
    }
}

/// Convert a wire-level VK-style integer back to a neutral [`KeyCode`].
///
/// Values with no known mapping round-trip through [`KeyCode::Unknown`].
#[must_use]
pub fn from_vk(vk: i32) -> KeyCode {
    if vk < 0 {
        return KeyCode::Unknown(u32::try_from(-vk).unwrap_or(u32::MAX));
    }
    match vk {
        0x41 => KeyCode::KeyA,
        0x42 => KeyCode::KeyB,
        0x43 => KeyCode::KeyC,
        0x44 => KeyCode::KeyD,
        0x45 => KeyCode::KeyE,
        0x46 => KeyCode::KeyF,
        0x47 => KeyCode::KeyG,
        0x48 => KeyCode::KeyH,
        0x49 => KeyCode::KeyI,
        0x4A => KeyCode::KeyJ,
        0x4B => KeyCode::KeyK,
        0x4C => KeyCode::KeyL,
        0x4D => KeyCode::KeyM,
        0x4E => KeyCode::KeyN,
        0x4F => KeyCode::KeyO,
        0x50 => KeyCode::KeyP,
        0x51 => KeyCode::KeyQ,
        0x52 => KeyCode::KeyR,
        0x53 => KeyCode::KeyS,
        0x54 => KeyCode::KeyT,
        0x55 => KeyCode::KeyU,
        0x56 => KeyCode::KeyV,
        0x57 => KeyCode::KeyW,
        0x58 => KeyCode::KeyX,
        0x59 => KeyCode::KeyY,
        0x5A => KeyCode::KeyZ,

        0x30 => KeyCode::Digit0,
        0x31 => KeyCode::Digit1,
        0x32 => KeyCode::Digit2,
        0x33 => KeyCode::Digit3,
        0x34 => KeyCode::Digit4,
        0x35 => KeyCode::Digit5,
        0x36 => KeyCode::Digit6,
        0x37 => KeyCode::Digit7,
        0x38 => KeyCode::Digit8,
        0x39 => KeyCode::Digit9,

        112 => KeyCode::F1,
        113 => KeyCode::F2,
        114 => KeyCode::F3,
        115 => KeyCode::F4,
        116 => KeyCode::F5,
        117 => KeyCode::F6,
        118 => KeyCode::F7,
        119 => KeyCode::F8,
        120 => KeyCode::F9,
        121 => KeyCode::F10,
        122 => KeyCode::F11,
        123 => KeyCode::F12,

        0xA0 => KeyCode::LeftShift,
        0xA1 => KeyCode::RightShift,
        0xA2 => KeyCode::LeftCtrl,
        0xA3 => KeyCode::RightCtrl,
        0xA4 => KeyCode::LeftAlt,
        0xA5 => KeyCode::RightAlt,
        0x5B => KeyCode::LeftMeta,
        0x5C => KeyCode::RightMeta,

        0x0D => KeyCode::Enter,
        0x1B => KeyCode::Escape,
        0x08 => KeyCode::Backspace,
        0x09 => KeyCode::Tab,
        0x20 => KeyCode::Space,
        0x14 => KeyCode::CapsLock,

        0x2D => KeyCode::Insert,
        0x2E => KeyCode::Delete,
        0x24 => KeyCode::Home,
        0x23 => KeyCode::End,
        0x21 => KeyCode::PageUp,
        0x22 => KeyCode::PageDown,
        38 => KeyCode::ArrowUp,
        40 => KeyCode::ArrowDown,
        37 => KeyCode::ArrowLeft,
        39 => KeyCode::ArrowRight,

        0xBD => KeyCode::Minus,
        0xBB => KeyCode::Equal,
        0xDB => KeyCode::BracketLeft,
        0xDD => KeyCode::BracketRight,
        0xDC => KeyCode::Backslash,
        0xBA => KeyCode::Semicolon,
        0xDE => KeyCode::Quote,
        0xC0 => KeyCode::Backquote,
        0xBC => KeyCode::Comma,
        0xBE => KeyCode::Period,
        0xBF => KeyCode::Slash,

        other => KeyCode::Unknown(u32::try_from(other).unwrap_or(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[KeyCode] = &[
        KeyCode::KeyA,
        KeyCode::KeyM,
        KeyCode::KeyZ,
        KeyCode::Digit0,
        KeyCode::Digit9,
        KeyCode::F1,
        KeyCode::F12,
        KeyCode::LeftShift,
        KeyCode::RightCtrl,
        KeyCode::LeftAlt,
        KeyCode::LeftMeta,
        KeyCode::Enter,
        KeyCode::Escape,
        KeyCode::ArrowUp,
        KeyCode::ArrowLeft,
        KeyCode::ArrowRight,
        KeyCode::ArrowDown,
        KeyCode::Semicolon,
        KeyCode::Slash,
    ];

    #[test]
    fn roundtrip_for_all_known_keys() {
        for &code in ALL {
            assert_eq!(from_vk(to_vk(code)), code, "{code:?} did not round-trip");
        }
    }

    #[test]
    fn function_keys_in_112_to_123_range() {
        assert_eq!(to_vk(KeyCode::F1), 112);
        assert_eq!(to_vk(KeyCode::F12), 123);
    }

    #[test]
    fn arrow_keys_match_glossary_constants() {
        assert_eq!(to_vk(KeyCode::ArrowLeft), 37);
        assert_eq!(to_vk(KeyCode::ArrowUp), 38);
        assert_eq!(to_vk(KeyCode::ArrowRight), 39);
        assert_eq!(to_vk(KeyCode::ArrowDown), 40);
    }

    #[test]
    fn letters_are_uppercase_ascii() {
        assert_eq!(to_vk(KeyCode::KeyA), u32::from(b'A') as i32);
        assert_eq!(to_vk(KeyCode::KeyZ), u32::from(b'Z') as i32);
    }

    #[test]
    fn unknown_roundtrips() {
        let code = KeyCode::Unknown(999);
        assert_eq!(from_vk(to_vk(code)), code);
    }

    #[test]
    fn unrecognised_vk_becomes_unknown() {
        assert_eq!(from_vk(777_777), KeyCode::Unknown(777_777));
    }
}
