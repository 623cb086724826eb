//! Clipboard content types (spec.md §3, §4.6).

use serde::{Deserialize, Serialize};

/// Clipboard content type. Only `Text` is implemented end to end; the
/// others are reserved on the wire per spec.md §4.6 ("Binary payload types
/// are reserved in the protocol but not implemented").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Image,
    Files,
}

/// Clipboard payload carried by `clipboard_sync`.
///
/// `data` is the plain text itself for [`ContentType::Text`]; for the
/// reserved types it would be a base64 encoding, matching the
/// originating application's own convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardContent {
    pub content_type: ContentType,
    pub data: String,
}

impl ClipboardContent {
    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Text,
            data: data.into(),
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.content_type == ContentType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_constructor_sets_content_type() {
        let c = ClipboardContent::text("hello");
        assert!(c.is_text());
        assert_eq!(c.data, "hello");
    }

    #[test]
    fn clipboard_content_roundtrip() {
        let c = ClipboardContent::text("shared text");
        let json = serde_json::to_string(&c).unwrap();
        let decoded: ClipboardContent = serde_json::from_str(&json).unwrap();
        assert_eq!(c, decoded);
    }
}
