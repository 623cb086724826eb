//! Integration tests exercising the full daemon event loop on loopback.
//!
//! Each test pairs two [`Daemon`]s, each driven by its own [`MockInputDriver`],
//! over real TCP sockets bound to `127.0.0.1:0`. Discovery is left disabled —
//! the peer link address is handed to `DaemonCommand::Connect` directly,
//! mirroring how a user-initiated `pair` would work over a known address.

use std::time::Duration;

use edgelink_daemon::config::{ClipboardConfig, Config, DaemonConfig, IdentityConfig, InputConfig};
use edgelink_daemon::daemon::{Daemon, DaemonCommand, DaemonStatus};
use edgelink_daemon::engine::EngineState;
use edgelink_input::mock::{MockInputDriver, MockInputHandle};
use edgelink_protocol::LinkState;
use edgelink_types::screen::{Screen, ScreenOwner};
use tokio::sync::{mpsc, watch};

struct TestPeer {
    #[allow(dead_code)]
    handle: MockInputHandle,
    command_tx: mpsc::Sender<DaemonCommand>,
    status_rx: watch::Receiver<DaemonStatus>,
    addr: std::net::SocketAddr,
    join: tokio::task::JoinHandle<()>,
}

fn screen(name: &str) -> Screen {
    Screen {
        id: format!("{name}-0"),
        name: name.to_string(),
        origin_x: 0,
        origin_y: 0,
        width: 1920,
        height: 1080,
        is_primary: true,
        owner: ScreenOwner::Local,
    }
}

fn config_for(name: &str) -> Config {
    Config {
        daemon: DaemonConfig {
            port: 0,
            bind: "127.0.0.1".to_string(),
            discovery: false,
            ..DaemonConfig::default()
        },
        identity: IdentityConfig {
            name: name.to_string(),
            platform: "test".to_string(),
        },
        input: InputConfig::default(),
        clipboard: ClipboardConfig::default(),
        screens: Vec::new(),
    }
}

async fn spawn_peer(name: &str) -> TestPeer {
    let (driver, _feed_tx) = MockInputDriver::new(vec![screen(name)]);
    let handle = driver.handle();
    let discovery: Box<dyn edgelink_discovery::Discovery> = Box::new(edgelink_discovery::UdpDiscovery::new());

    let mut daemon = Daemon::new(config_for(name), edgelink_types::PeerId::new(), driver, discovery)
        .await
        .unwrap();
    let addr = daemon.local_addr().unwrap();
    let command_tx = daemon.command_sender();
    let status_rx = daemon.status_receiver();

    let join = tokio::spawn(async move {
        let _ = daemon.run().await;
    });

    TestPeer { handle, command_tx, status_rx, addr, join }
}

impl TestPeer {
    async fn shutdown(self) {
        let _ = self.command_tx.send(DaemonCommand::Shutdown).await;
        let _ = tokio::time::timeout(Duration::from_secs(5), self.join).await;
    }
}

async fn wait_for<F: Fn(&DaemonStatus) -> bool>(rx: &mut watch::Receiver<DaemonStatus>, pred: F) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if pred(&rx.borrow()) {
                return;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("condition never became true");
}

#[tokio::test]
async fn handshake_brings_both_sides_to_ready() {
    let mut a = spawn_peer("machine-a").await;
    let mut b = spawn_peer("machine-b").await;

    a.command_tx.send(DaemonCommand::Connect(b.addr)).await.unwrap();

    wait_for(&mut a.status_rx, |s| s.link_state == LinkState::Ready).await;
    wait_for(&mut b.status_rx, |s| s.link_state == LinkState::Ready).await;

    let status_a = a.status_rx.borrow().clone();
    let status_b = b.status_rx.borrow().clone();
    assert_eq!(status_a.peer_info.unwrap().name, "machine-b");
    assert_eq!(status_b.peer_info.unwrap().name, "machine-a");
    assert_eq!(status_a.engine_state, EngineState::Local);
    assert_eq!(status_b.engine_state, EngineState::Local);

    a.shutdown().await;
    b.shutdown().await;
}

#[tokio::test]
async fn second_inbound_connection_is_refused_while_one_is_active() {
    let mut a = spawn_peer("left").await;
    let mut b = spawn_peer("right").await;
    let c = spawn_peer("intruder").await;

    a.command_tx.send(DaemonCommand::Connect(b.addr)).await.unwrap();
    wait_for(&mut a.status_rx, |s| s.link_state == LinkState::Ready).await;
    wait_for(&mut b.status_rx, |s| s.link_state == LinkState::Ready).await;

    // b is already linked to a; c tries to dial b and should simply never
    // reach Ready, since b's accept loop refuses it while a session is active.
    c.command_tx.send(DaemonCommand::Connect(b.addr)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_ne!(c.status_rx.borrow().link_state, LinkState::Ready);
    assert_eq!(b.status_rx.borrow().peer_info.unwrap().name, "left");

    a.shutdown().await;
    b.shutdown().await;
    c.shutdown().await;
}

#[tokio::test]
async fn disconnect_returns_both_sides_to_listening() {
    let mut a = spawn_peer("left").await;
    let mut b = spawn_peer("right").await;

    a.command_tx.send(DaemonCommand::Connect(b.addr)).await.unwrap();
    wait_for(&mut a.status_rx, |s| s.link_state == LinkState::Ready).await;
    wait_for(&mut b.status_rx, |s| s.link_state == LinkState::Ready).await;

    a.command_tx.send(DaemonCommand::Disconnect).await.unwrap();
    wait_for(&mut a.status_rx, |s| s.link_state == LinkState::Listening).await;
    wait_for(&mut b.status_rx, |s| s.link_state == LinkState::Listening).await;

    assert!(a.status_rx.borrow().peer_info.is_none());
    assert!(b.status_rx.borrow().peer_info.is_none());

    a.shutdown().await;
    b.shutdown().await;
}

#[tokio::test]
async fn set_clipboard_enabled_updates_status() {
    let mut a = spawn_peer("solo").await;

    assert!(a.status_rx.borrow().clipboard_enabled);
    a.command_tx
        .send(DaemonCommand::SetClipboardEnabled(false))
        .await
        .unwrap();
    wait_for(&mut a.status_rx, |s| !s.clipboard_enabled).await;

    a.shutdown().await;
}

#[tokio::test]
async fn disconnect_with_no_active_session_leaves_status_listening() {
    let mut a = spawn_peer("idle").await;
    a.command_tx.send(DaemonCommand::Disconnect).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(a.status_rx.borrow().link_state, LinkState::Listening);
    a.shutdown().await;
}
