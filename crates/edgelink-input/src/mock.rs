//! Mock input backend for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use edgelink_types::screen::Screen;
use edgelink_types::{InputEvent, KeyCode, MouseButton};
use tokio::sync::mpsc;

use crate::error::InputError;
use crate::InputDriver;

/// Recorded call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    WarpPointer(i32, i32),
    MouseMove { x: i32, y: i32, absolute: bool },
    MouseButton { button: MouseButton, down: bool },
    MouseScroll { delta_x: i32, delta_y: i32 },
    Key { code: KeyCode, down: bool },
    SetClipboardText(String),
}

#[derive(Default)]
struct State {
    cursor: (i32, i32),
    clipboard: String,
    capturing: bool,
    calls: Vec<RecordedCall>,
}

/// In-memory [`InputDriver`] for tests and the integration-test second peer.
///
/// `feed_tx` (from [`MockInputDriver::new`]) injects [`InputEvent`]s as if
/// they had been captured, once `begin_capture` has been called.
pub struct MockInputDriver {
    screens: Vec<Screen>,
    state: Arc<Mutex<State>>,
    feed_rx: Option<mpsc::Receiver<InputEvent>>,
}

impl MockInputDriver {
    #[must_use]
    pub fn new(screens: Vec<Screen>) -> (Self, mpsc::Sender<InputEvent>) {
        let (feed_tx, feed_rx) = mpsc::channel(1024);
        let driver = Self {
            screens,
            state: Arc::new(Mutex::new(State::default())),
            feed_rx: Some(feed_rx),
        };
        (driver, feed_tx)
    }

    #[must_use]
    pub fn handle(&self) -> MockInputHandle {
        MockInputHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Clonable observer handle for [`MockInputDriver`].
#[derive(Clone)]
pub struct MockInputHandle {
    state: Arc<Mutex<State>>,
}

impl MockInputHandle {
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    #[must_use]
    pub fn clipboard_text(&self) -> String {
        self.state.lock().unwrap().clipboard.clone()
    }

    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.state.lock().unwrap().capturing
    }
}

#[async_trait]
impl InputDriver for MockInputDriver {
    async fn pointer_position(&self) -> Result<(i32, i32), InputError> {
        Ok(self.state.lock().unwrap().cursor)
    }

    async fn warp_pointer(&self, x: i32, y: i32) -> Result<(), InputError> {
        let mut state = self.state.lock().unwrap();
        state.cursor = (x, y);
        state.calls.push(RecordedCall::WarpPointer(x, y));
        Ok(())
    }

    async fn begin_capture(&mut self, _suppress: bool) -> Result<mpsc::Receiver<InputEvent>, InputError> {
        self.state.lock().unwrap().capturing = true;
        self.feed_rx
            .take()
            .ok_or_else(|| InputError::Other(anyhow::anyhow!("MockInputDriver already capturing")))
    }

    async fn end_capture(&mut self) -> Result<(), InputError> {
        self.state.lock().unwrap().capturing = false;
        Ok(())
    }

    async fn synthesise_mouse_move(&self, x: i32, y: i32, absolute: bool) -> Result<(), InputError> {
        let mut state = self.state.lock().unwrap();
        if absolute {
            state.cursor = (x, y);
        } else {
            state.cursor = (state.cursor.0 + x, state.cursor.1 + y);
        }
        state.calls.push(RecordedCall::MouseMove { x, y, absolute });
        Ok(())
    }

    async fn synthesise_mouse_button(&self, button: MouseButton, down: bool) -> Result<(), InputError> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(RecordedCall::MouseButton { button, down });
        Ok(())
    }

    async fn synthesise_mouse_scroll(&self, delta_x: i32, delta_y: i32) -> Result<(), InputError> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(RecordedCall::MouseScroll { delta_x, delta_y });
        Ok(())
    }

    async fn synthesise_key(&self, code: KeyCode, down: bool) -> Result<(), InputError> {
        self.state.lock().unwrap().calls.push(RecordedCall::Key { code, down });
        Ok(())
    }

    async fn get_clipboard_text(&self) -> Result<String, InputError> {
        Ok(self.state.lock().unwrap().clipboard.clone())
    }

    async fn set_clipboard_text(&self, text: &str) -> Result<(), InputError> {
        let mut state = self.state.lock().unwrap();
        state.clipboard = text.to_string();
        state.calls.push(RecordedCall::SetClipboardText(text.to_string()));
        Ok(())
    }

    async fn enumerate_screens(&self) -> Result<Vec<Screen>, InputError> {
        Ok(self.screens.clone())
    }
}
