//! Platform-abstracted input capture and emulation for edgelink.
//!
//! This crate defines the [`InputDriver`] trait: the single abstract port
//! spec.md §4.4 describes, merging the teacher's separate capture and
//! emulation backends into one contract since both sides of a link use the
//! same operations (capture when `LOCAL`, synthesis when `CONTROLLED`).

use async_trait::async_trait;
use edgelink_types::screen::Screen;
use edgelink_types::{InputEvent, KeyCode, MouseButton};
use tokio::sync::mpsc;

pub mod error;
pub mod mock;

#[cfg(target_os = "linux")]
pub mod linux;

pub use error::InputError;

/// A single abstract input port, implemented per host OS (spec.md §4.4).
#[async_trait]
pub trait InputDriver: Send + 'static {
    /// Current pointer position in the local virtual plane. Must be cheap
    /// enough to call at ~120 Hz.
    async fn pointer_position(&self) -> Result<(i32, i32), InputError>;

    /// Move the pointer without generating motion events. The next
    /// `pointer_position` sample must reflect the warp within ~20ms.
    async fn warp_pointer(&self, x: i32, y: i32) -> Result<(), InputError>;

    /// Install system hooks that deliver mouse-move, mouse-button, scroll,
    /// and key events to the returned channel. When `suppress` is true the
    /// events must not reach other local applications.
    async fn begin_capture(&mut self, suppress: bool) -> Result<mpsc::Receiver<InputEvent>, InputError>;

    /// Uninstall the hooks installed by `begin_capture`; events flow
    /// normally to local applications again.
    async fn end_capture(&mut self) -> Result<(), InputError>;

    /// Synthesise pointer motion on this host.
    async fn synthesise_mouse_move(&self, x: i32, y: i32, absolute: bool) -> Result<(), InputError>;

    /// Synthesise a mouse button press or release.
    async fn synthesise_mouse_button(
        &self,
        button: MouseButton,
        down: bool,
    ) -> Result<(), InputError>;

    /// Synthesise a scroll event, in notch units (120 per notch).
    async fn synthesise_mouse_scroll(&self, delta_x: i32, delta_y: i32) -> Result<(), InputError>;

    /// Synthesise a key press or release.
    async fn synthesise_key(&self, code: KeyCode, down: bool) -> Result<(), InputError>;

    /// Read the current clipboard text content.
    async fn get_clipboard_text(&self) -> Result<String, InputError>;

    /// Set the clipboard text content. Must not trigger a change
    /// notification that the clipboard bridge would mistake for a local edit.
    async fn set_clipboard_text(&self, text: &str) -> Result<(), InputError>;

    /// The local screens making up this host's contribution to the
    /// virtual plane.
    async fn enumerate_screens(&self) -> Result<Vec<Screen>, InputError>;
}
