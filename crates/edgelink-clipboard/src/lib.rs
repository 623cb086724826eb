//! Clipboard bridge for edgelink (spec.md §4.6).
//!
//! [`ClipboardBridge`] drives an [`InputDriver`]'s `get_clipboard_text`/
//! `set_clipboard_text` on a poll loop, tracking both the last text it saw
//! locally and the last text it applied from the peer so an inbound sync
//! does not echo straight back out on the next poll.

use std::time::Duration;

use edgelink_input::InputDriver;
use edgelink_types::ClipboardContent;

pub mod error;

pub use error::ClipboardError;

/// Poll interval for local clipboard changes.
pub const CLIPBOARD_POLL: Duration = Duration::from_millis(500);

/// Tracks local/peer clipboard state to drive the sync decision in §4.6.
#[derive(Default)]
pub struct ClipboardBridge {
    last_seen: Option<String>,
    last_applied_from_peer: Option<String>,
}

impl ClipboardBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the local clipboard. Returns the content to broadcast if it
    /// changed since the last poll and did not come from the peer.
    pub async fn poll<D>(&mut self, driver: &D) -> Result<Option<ClipboardContent>, ClipboardError>
    where
        D: InputDriver + ?Sized,
    {
        let current = driver.get_clipboard_text().await?;

        let changed = self.last_seen.as_deref() != Some(current.as_str());
        let from_peer = self.last_applied_from_peer.as_deref() == Some(current.as_str());

        self.last_seen = Some(current.clone());

        if changed && !from_peer {
            Ok(Some(ClipboardContent::text(current)))
        } else {
            Ok(None)
        }
    }

    /// Apply clipboard text received from the peer, recording it so the
    /// next `poll` does not echo it back.
    pub async fn apply_inbound<D>(&mut self, driver: &D, data: &str) -> Result<(), ClipboardError>
    where
        D: InputDriver + ?Sized,
    {
        driver.set_clipboard_text(data).await?;
        self.last_seen = Some(data.to_string());
        self.last_applied_from_peer = Some(data.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgelink_input::mock::MockInputDriver;
    use edgelink_types::screen::{Screen, ScreenOwner};

    fn screen() -> Screen {
        Screen {
            id: "a".to_string(),
            name: "a".to_string(),
            origin_x: 0,
            origin_y: 0,
            width: 1920,
            height: 1080,
            is_primary: true,
            owner: ScreenOwner::Local,
        }
    }

    #[tokio::test]
    async fn local_change_is_reported_once() {
        let (driver, _tx) = MockInputDriver::new(vec![screen()]);
        let mut bridge = ClipboardBridge::new();

        assert!(bridge.poll(&driver).await.unwrap().is_none());

        driver.set_clipboard_text("hello").await.unwrap();
        let change = bridge.poll(&driver).await.unwrap();
        assert_eq!(change.unwrap().data, "hello");

        assert!(bridge.poll(&driver).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inbound_sync_does_not_echo_back() {
        let (driver, _tx) = MockInputDriver::new(vec![screen()]);
        let mut bridge = ClipboardBridge::new();

        bridge.apply_inbound(&driver, "from peer").await.unwrap();
        assert_eq!(driver.get_clipboard_text().await.unwrap(), "from peer");

        assert!(bridge.poll(&driver).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn local_edit_after_inbound_sync_is_reported() {
        let (driver, _tx) = MockInputDriver::new(vec![screen()]);
        let mut bridge = ClipboardBridge::new();

        bridge.apply_inbound(&driver, "from peer").await.unwrap();
        driver.set_clipboard_text("local edit").await.unwrap();

        let change = bridge.poll(&driver).await.unwrap();
        assert_eq!(change.unwrap().data, "local edit");
    }
}
