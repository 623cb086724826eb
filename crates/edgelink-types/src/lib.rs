//! Shared types for edgelink.
//!
//! This crate contains all types shared across the edgelink workspace: peer
//! identity, screen geometry, input events, the neutral VK key-code space,
//! clipboard content, and the wire message envelope.

pub mod arrangement;
pub mod clipboard;
pub mod event;
pub mod message;
pub mod peer;
pub mod screen;
pub mod vk;

pub use arrangement::{Arrangement, EDGE_THRESHOLD, ENTRY_INSET, EXIT_INSET};
pub use clipboard::{ClipboardContent, ContentType};
pub use event::{ButtonState, InputEvent, KeyCode, Modifiers, MouseButton};
pub use message::{ButtonAction, Message, ProtocolVersion, PROTOCOL_VERSION};
pub use peer::{Peer, PeerId};
pub use screen::{Screen, ScreenEdge, ScreenOwner};
pub use vk::{from_vk, to_vk};
