//! Transfer engine: the state machine that moves control of the pointer
//! and keyboard between LOCAL, REMOTE, and CONTROLLED (spec.md §4.5).
//!
//! [`TransferEngine`] owns the [`Arrangement`] and ticks at ~120 Hz while
//! LOCAL or REMOTE, sampling or driving the pointer; while CONTROLLED it is
//! purely reactive, driven by [`TransferEngine::handle_inbound`].

use std::time::Duration;

use edgelink_input::InputDriver;
use edgelink_protocol::MessageSender;
use edgelink_types::event::{ButtonState, InputEvent, KeyCode, Modifiers};
use edgelink_types::message::ButtonAction;
use edgelink_types::{from_vk, to_vk, Arrangement, Message};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// Poll interval while LOCAL or REMOTE (spec.md §4.5: "~120 Hz").
pub const POLL_INTERVAL: Duration = Duration::from_millis(8);
/// Settle time after warping the pointer before trusting the next sample.
pub const SETTLE_DELAY: Duration = Duration::from_millis(50);
/// Distance from the trap point that triggers a re-centering warp.
pub const TRAP_RADIUS: i32 = 200;
/// Modifiers that must all be held to trigger the return-to-LOCAL hotkey.
const RETURN_HOTKEY: KeyCode = KeyCode::KeyM;

/// Where control currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// This host owns the pointer; watching for an edge crossing.
    Local,
    /// This host is sending input to the peer; `screen`/`x`/`y` track the
    /// virtual cursor on the peer's geometry.
    Remote { screen: usize, x: i32, y: i32 },
    /// The peer is sending input to this host.
    Controlled,
}

/// Drives pointer/keyboard handoff for one peer link.
pub struct TransferEngine {
    arrangement: Arrangement,
    state: EngineState,
    trap_point: Option<(i32, i32)>,
    last_pointer: Option<(i32, i32)>,
    capture_rx: Option<mpsc::Receiver<InputEvent>>,
    /// Modifiers held while sending (tracks what this host has pressed
    /// into REMOTE mode, so a link loss can release them cleanly).
    sent_modifiers: Modifiers,
    /// Modifiers held while receiving (mirrors the peer's presses while
    /// CONTROLLED, so a link loss can release them on this host).
    received_modifiers: Modifiers,
    pointer_gain: f64,
    bottom_up_y: bool,
}

impl TransferEngine {
    #[must_use]
    pub fn new(arrangement: Arrangement, pointer_gain: f64, bottom_up_y: bool) -> Self {
        Self {
            arrangement,
            state: EngineState::Local,
            trap_point: None,
            last_pointer: None,
            capture_rx: None,
            sent_modifiers: Modifiers::default(),
            received_modifiers: Modifiers::default(),
            pointer_gain,
            bottom_up_y,
        }
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    #[must_use]
    pub fn arrangement_mut(&mut self) -> &mut Arrangement {
        &mut self.arrangement
    }

    /// One iteration of the poll loop. A no-op while `Controlled`.
    pub async fn tick<D: InputDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        sender: &MessageSender,
    ) -> Result<(), edgelink_input::InputError> {
        match self.state {
            EngineState::Local => self.tick_local(driver, sender).await,
            EngineState::Remote { .. } => self.tick_remote(driver, sender).await,
            EngineState::Controlled => Ok(()),
        }
    }

    async fn tick_local<D: InputDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        sender: &MessageSender,
    ) -> Result<(), edgelink_input::InputError> {
        let (x, y) = driver.pointer_position().await?;
        if self.arrangement.hit_edge(x, y) {
            self.transition_local_to_remote(driver, sender, x, y).await?;
        }
        Ok(())
    }

    /// Enter REMOTE and tell the peer it is becoming `Controlled` (spec.md
    /// §4.5.2 step 6): the `ModeSwitch{active: true, ...}` send is what
    /// actually flips the peer's `handle_inbound` into forwarding captured
    /// input to its synthesiser — without it the peer never leaves LOCAL.
    async fn transition_local_to_remote<D: InputDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        sender: &MessageSender,
        x: i32,
        y: i32,
    ) -> Result<(), edgelink_input::InputError> {
        let Some((idx, rx, ry)) = self.arrangement.entry_point(x, y) else {
            return Ok(());
        };
        let trap = trap_centroid(self.arrangement.local_screens()).unwrap_or((x, y));
        let rx_events = driver.begin_capture(true).await?;
        self.capture_rx = Some(rx_events);
        driver.warp_pointer(trap.0, trap.1).await?;
        tokio::time::sleep(SETTLE_DELAY).await;
        self.trap_point = Some(trap);
        self.last_pointer = Some(trap);
        self.sent_modifiers = Modifiers::default();
        self.state = EngineState::Remote { screen: idx, x: rx, y: ry };
        if sender
            .send(&Message::ModeSwitch {
                active: true,
                screen: Some(idx),
                x: Some(rx),
                y: Some(ry),
                edge: Some(self.arrangement.transfer_edge()),
            })
            .await
            .is_err()
        {
            warn!("failed to send mode switch to peer");
        }
        debug!(screen = idx, rx, ry, "entering remote control");
        Ok(())
    }

    async fn tick_remote<D: InputDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        sender: &MessageSender,
    ) -> Result<(), edgelink_input::InputError> {
        loop {
            let Some(rx) = self.capture_rx.as_mut() else { break };
            let Ok(event) = rx.try_recv() else { break };
            if !matches!(self.state, EngineState::Remote { .. }) {
                break;
            }
            if self.returned_via_hotkey(&event) {
                self.trigger_return_hotkey(driver, sender).await?;
                return Ok(());
            }
            self.forward_captured_event(sender, event).await;
        }

        let EngineState::Remote { screen, x, y } = self.state else {
            return Ok(());
        };
        let (px, py) = driver.pointer_position().await?;
        let Some((lpx, lpy)) = self.last_pointer else {
            self.last_pointer = Some((px, py));
            return Ok(());
        };

        let dx = px - lpx;
        let dy = if self.bottom_up_y { lpy - py } else { py - lpy };
        self.last_pointer = Some((px, py));
        if dx == 0 && dy == 0 {
            return Ok(());
        }

        #[allow(clippy::cast_possible_truncation)]
        let scaled_dx = (f64::from(dx) * self.pointer_gain).round() as i32;
        #[allow(clippy::cast_possible_truncation)]
        let scaled_dy = (f64::from(dy) * self.pointer_gain).round() as i32;
        let nx = x + scaled_dx;
        let ny = y + scaled_dy;

        if self.arrangement.crossed_back(screen, nx, ny) {
            self.transition_remote_to_local(driver, sender, true).await?;
            return Ok(());
        }

        let (cx, cy) = self.arrangement.clamp_to_remote(screen, nx, ny);
        self.state = EngineState::Remote { screen, x: cx, y: cy };
        if sender
            .send(&Message::MouseMove { x: cx, y: cy, absolute: true })
            .await
            .is_err()
        {
            warn!("failed to send remote mouse move");
        }

        if let Some((tx, ty)) = self.trap_point {
            let drift = px.abs_diff(tx) + py.abs_diff(ty);
            if drift > u32::try_from(TRAP_RADIUS).unwrap_or(u32::MAX) {
                driver.warp_pointer(tx, ty).await?;
                self.last_pointer = Some((tx, ty));
            }
        }
        Ok(())
    }

    fn returned_via_hotkey(&self, event: &InputEvent) -> bool {
        matches!(
            event,
            InputEvent::Key { code: RETURN_HOTKEY, state: ButtonState::Down }
        ) && self.sent_modifiers.ctrl
            && self.sent_modifiers.alt
    }

    async fn forward_captured_event(&mut self, sender: &MessageSender, event: InputEvent) {
        let msg = match event {
            InputEvent::Key { code, state } => {
                self.sent_modifiers.apply(code, state);
                Message::Key {
                    key_code: to_vk(code),
                    action: ButtonAction::from(state),
                    modifiers: self.sent_modifiers,
                }
            }
            InputEvent::MouseButton { button, state, .. } => {
                let (x, y) = self.virtual_cursor();
                Message::MouseButton {
                    button,
                    action: ButtonAction::from(state),
                    x,
                    y,
                }
            }
            InputEvent::Scroll { delta_x, delta_y } => {
                Message::MouseScroll { delta_x, delta_y }
            }
            // Motion is derived from polled pointer position, not replayed here.
            InputEvent::MouseMove { .. } => return,
        };
        if sender.send(&msg).await.is_err() {
            warn!("failed to forward captured input");
        }
    }

    fn virtual_cursor(&self) -> (i32, i32) {
        match self.state {
            EngineState::Remote { x, y, .. } => (x, y),
            _ => (0, 0),
        }
    }

    async fn trigger_return_hotkey<D: InputDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        sender: &MessageSender,
    ) -> Result<(), edgelink_input::InputError> {
        for code in self.sent_modifiers.held_keys() {
            let _ = sender
                .send(&Message::Key {
                    key_code: to_vk(code),
                    action: ButtonAction::Up,
                    modifiers: Modifiers::default(),
                })
                .await;
        }
        self.sent_modifiers = Modifiers::default();
        self.transition_remote_to_local(driver, sender, true).await
    }

    async fn transition_remote_to_local<D: InputDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        sender: &MessageSender,
        send_mode_switch: bool,
    ) -> Result<(), edgelink_input::InputError> {
        let EngineState::Remote { screen, x, y } = self.state else {
            return Ok(());
        };
        if send_mode_switch {
            let _ = sender
                .send(&Message::ModeSwitch {
                    active: false,
                    screen: None,
                    x: None,
                    y: None,
                    edge: None,
                })
                .await;
        }
        driver.end_capture().await?;
        self.capture_rx = None;
        if let Some((lx, ly)) = self.arrangement.exit_point(screen, x, y) {
            driver.warp_pointer(lx, ly).await?;
            self.last_pointer = Some((lx, ly));
        }
        self.trap_point = None;
        self.state = EngineState::Local;
        debug!("returned to local control");
        Ok(())
    }

    /// Apply an inbound message while this host may become, or already is,
    /// `Controlled` (spec.md §4.5.6/§4.5.7).
    pub async fn handle_inbound<D: InputDriver + ?Sized>(
        &mut self,
        driver: &mut D,
        sender: &MessageSender,
        msg: &Message,
    ) -> Result<(), edgelink_input::InputError> {
        match (msg, self.state) {
            (Message::ModeSwitch { active: true, x, y, .. }, EngineState::Local) => {
                let (x, y) = (x.unwrap_or(0), y.unwrap_or(0));
                driver.warp_pointer(x, y).await?;
                self.received_modifiers = Modifiers::default();
                self.state = EngineState::Controlled;
                debug!("entering controlled mode");
            }
            (Message::ModeSwitch { active: true, .. }, _) => {
                // Already REMOTE or CONTROLLED: refuse, the peer is confused
                // about who owns the link (spec.md §4.5.7).
                let _ = sender
                    .send(&Message::ModeSwitch {
                        active: false,
                        screen: None,
                        x: None,
                        y: None,
                        edge: None,
                    })
                    .await;
            }
            (Message::ModeSwitch { active: false, .. }, EngineState::Controlled) => {
                self.state = EngineState::Local;
                debug!("leaving controlled mode");
            }
            _ => {}
        }

        if self.state != EngineState::Controlled {
            return Ok(());
        }

        match *msg {
            Message::MouseMove { x, y, absolute } => {
                driver.synthesise_mouse_move(x, y, absolute).await?;
            }
            Message::MouseButton { button, action, .. } => {
                driver
                    .synthesise_mouse_button(button, action == ButtonAction::Down)
                    .await?;
            }
            Message::MouseScroll { delta_x, delta_y } => {
                driver.synthesise_mouse_scroll(delta_x, delta_y).await?;
            }
            Message::Key { key_code, action, .. } => {
                let code = from_vk(key_code);
                let state = ButtonState::from(action);
                self.received_modifiers.apply(code, state);
                driver.synthesise_key(code, action == ButtonAction::Down).await?;
            }
            Message::Hello { .. }
            | Message::Connected { .. }
            | Message::Ping {}
            | Message::Pong {}
            | Message::Disconnect {}
            | Message::ModeSwitch { .. }
            | Message::ClipboardSync { .. }
            | Message::ScreenInfo { .. } => {}
        }
        Ok(())
    }

    /// Release whatever this engine was holding when the peer link dropped
    /// (spec.md §4.5.7 "Link loss").
    pub async fn handle_link_lost<D: InputDriver + ?Sized>(
        &mut self,
        driver: &mut D,
    ) -> Result<(), edgelink_input::InputError> {
        match self.state {
            EngineState::Remote { screen, x, y } => {
                driver.end_capture().await?;
                self.capture_rx = None;
                if let Some((lx, ly)) = self.arrangement.exit_point(screen, x, y) {
                    driver.warp_pointer(lx, ly).await?;
                }
                self.trap_point = None;
                self.last_pointer = None;
                self.sent_modifiers = Modifiers::default();
                self.state = EngineState::Local;
                trace!("link lost while remote: returned to local silently");
            }
            EngineState::Controlled => {
                for code in self.received_modifiers.held_keys() {
                    driver.synthesise_key(code, false).await?;
                }
                self.received_modifiers = Modifiers::default();
                self.state = EngineState::Local;
                trace!("link lost while controlled: released held modifiers");
            }
            EngineState::Local => {}
        }
        Ok(())
    }
}

/// A stable point to warp the pointer to before capture: the centroid of
/// the LOCAL region's bounding box.
fn trap_centroid(screens: &[edgelink_types::screen::Screen]) -> Option<(i32, i32)> {
    if screens.is_empty() {
        return None;
    }
    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;
    for s in screens {
        min_x = min_x.min(s.origin_x);
        min_y = min_y.min(s.origin_y);
        max_x = max_x.max(s.right());
        max_y = max_y.max(s.bottom());
    }
    Some(((min_x + max_x) / 2, (min_y + max_y) / 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgelink_input::mock::MockInputDriver;
    use edgelink_protocol::PeerConnection;
    use edgelink_types::screen::{Screen, ScreenEdge, ScreenOwner};
    use tokio::net::{TcpListener, TcpStream};

    fn local_screen() -> Screen {
        Screen {
            id: "local".into(),
            name: "local".into(),
            origin_x: 0,
            origin_y: 0,
            width: 1920,
            height: 1080,
            is_primary: true,
            owner: ScreenOwner::Local,
        }
    }

    fn remote_screen() -> Screen {
        Screen {
            id: "remote".into(),
            name: "remote".into(),
            origin_x: 0,
            origin_y: 0,
            width: 1920,
            height: 1080,
            is_primary: false,
            owner: ScreenOwner::Remote,
        }
    }

    fn arrangement() -> Arrangement {
        let mut arr = Arrangement::new();
        arr.set_local_screens(vec![local_screen()]);
        arr.set_remote_screens(vec![remote_screen()]);
        arr.set_transfer_edge(ScreenEdge::Right);
        arr
    }

    /// A live, otherwise-unused loopback link whose `MessageSender` half the
    /// engine can send frames into without a second party reading them.
    async fn test_sender() -> MessageSender {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (accepted, connected) = tokio::join!(listener.accept(), TcpStream::connect(addr));
        let (stream, _) = accepted.unwrap();
        let connected = connected.unwrap();
        // Keep the accepted side alive for the test's duration by leaking
        // it into a background task; only `connected`'s sender is used.
        tokio::spawn(async move {
            let conn = PeerConnection::new(stream).unwrap();
            while conn.recv().await.unwrap_or(None).is_some() {}
        });
        PeerConnection::new(connected).unwrap().sender()
    }

    #[tokio::test]
    async fn entering_remote_sends_mode_switch_active() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (accepted, connected) = tokio::join!(listener.accept(), TcpStream::connect(addr));
        let (accepted_stream, _) = accepted.unwrap();
        let peer = PeerConnection::new(accepted_stream).unwrap();
        let sender = PeerConnection::new(connected.unwrap()).unwrap().sender();

        let (mut driver, _feed) = MockInputDriver::new(vec![local_screen()]);
        driver.warp_pointer(1920, 540).await.unwrap();
        let mut engine = TransferEngine::new(arrangement(), 1.0, false);

        engine.tick_local(&mut driver, &sender).await.unwrap();
        assert!(matches!(engine.state(), EngineState::Remote { .. }));

        let frame = peer.recv().await.unwrap().unwrap();
        match frame {
            Message::ModeSwitch { active, x, y, .. } => {
                assert!(active);
                assert_eq!((x, y), (Some(50), Some(540)));
            }
            other => panic!("expected ModeSwitch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn hit_edge_transitions_to_remote() {
        let (mut driver, _feed) = MockInputDriver::new(vec![local_screen()]);
        driver.warp_pointer(1920, 540).await.unwrap();
        let mut engine = TransferEngine::new(arrangement(), 1.0, false);
        let sender = test_sender().await;

        engine.tick_local(&mut driver, &sender).await.unwrap();

        assert!(matches!(engine.state(), EngineState::Remote { .. }));
    }

    #[tokio::test]
    async fn crossed_back_returns_to_local() {
        let (mut driver, _feed) = MockInputDriver::new(vec![local_screen()]);
        driver.warp_pointer(1920, 540).await.unwrap();
        let mut engine = TransferEngine::new(arrangement(), 1.0, false);
        let sender = test_sender().await;
        engine.tick_local(&mut driver, &sender).await.unwrap();
        assert!(matches!(engine.state(), EngineState::Remote { .. }));

        // Simulate the pointer drifting left far enough to carry the virtual
        // cursor (currently at the entry inset, 50px past the seam) back
        // across the seam.
        let trap = engine.trap_point.unwrap();
        driver.warp_pointer(trap.0 - 60, trap.1).await.unwrap();

        engine.tick_remote(&mut driver, &sender).await.unwrap();

        assert!(matches!(engine.state(), EngineState::Local));
    }

    #[tokio::test]
    async fn inbound_mode_switch_enters_controlled() {
        let (mut driver, _feed) = MockInputDriver::new(vec![local_screen()]);
        let mut engine = TransferEngine::new(arrangement(), 1.0, false);
        let sender = test_sender().await;

        engine
            .handle_inbound(
                &mut driver,
                &sender,
                &Message::ModeSwitch {
                    active: true,
                    screen: None,
                    x: Some(100),
                    y: Some(200),
                    edge: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(engine.state(), EngineState::Controlled);
    }

    #[tokio::test]
    async fn link_loss_while_controlled_releases_modifiers() {
        let (mut driver, _feed) = MockInputDriver::new(vec![local_screen()]);
        let mut engine = TransferEngine::new(arrangement(), 1.0, false);
        engine.state = EngineState::Controlled;
        engine.received_modifiers.ctrl = true;

        engine.handle_link_lost(&mut driver).await.unwrap();

        assert_eq!(engine.state(), EngineState::Local);
        assert!(!engine.received_modifiers.any_held());
    }
}
