//! Session Controller: ties discovery, the peer link, the transfer engine,
//! and the clipboard bridge together behind one event loop (spec.md §4.7).

use std::collections::HashMap;
use std::net::SocketAddr;

use edgelink_clipboard::ClipboardBridge;
use edgelink_discovery::{DiscoveredPeer, Discovery, DiscoveryEvent};
use edgelink_input::InputDriver;
use edgelink_protocol::{connect, LinkState, TcpTransport};
use edgelink_types::{Arrangement, Message, Peer, PeerId, ScreenEdge};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::{EngineState, TransferEngine, POLL_INTERVAL};
use crate::error::DaemonError;
use crate::session::{PeerSession, IDLE_TIMEOUT, PING_TIMEOUT};

/// Commands accepted from the CLI/IPC layer (spec.md §4.7).
pub enum DaemonCommand {
    /// Dial a peer at this address. Carries the port explicitly rather than
    /// assuming the peer listens on our own configured port, since a peer
    /// bound to an ephemeral port (tests, or a NATed host) may not share it.
    Connect(SocketAddr),
    Disconnect,
    SetTransferEdge(ScreenEdge),
    SetClipboardEnabled(bool),
    Shutdown,
}

/// A point-in-time snapshot of daemon state, published to the CLI's
/// `status` subcommand (spec.md §4.7).
#[derive(Debug, Clone)]
pub struct DaemonStatus {
    pub link_state: LinkState,
    pub peer_info: Option<Peer>,
    pub engine_state: EngineState,
    pub discovered_peers: Vec<DiscoveredPeer>,
    pub transfer_edge: ScreenEdge,
    pub clipboard_enabled: bool,
}

/// The core edgelink daemon: one peer link at a time, driving a transfer
/// engine and clipboard bridge over it.
pub struct Daemon<D: InputDriver> {
    config: Config,
    peer_id: PeerId,
    driver: D,
    transport: TcpTransport,
    discovery: Box<dyn Discovery>,
    discovery_rx: Option<mpsc::Receiver<DiscoveryEvent>>,
    discovered: HashMap<PeerId, DiscoveredPeer>,
    session: Option<PeerSession>,
    engine: TransferEngine,
    clipboard: ClipboardBridge,
    clipboard_enabled: bool,
    link_state: LinkState,
    last_activity: Instant,
    pending_ping: Option<Instant>,
    command_tx: mpsc::Sender<DaemonCommand>,
    command_rx: mpsc::Receiver<DaemonCommand>,
    status_tx: watch::Sender<DaemonStatus>,
}

impl<D: InputDriver> Daemon<D> {
    /// Bind the peer link listener, start discovery if enabled, and build
    /// the transfer engine from the driver's local geometry.
    pub async fn new(
        config: Config,
        peer_id: PeerId,
        driver: D,
        mut discovery: Box<dyn Discovery>,
    ) -> Result<Self, DaemonError> {
        let local_screens = driver.enumerate_screens().await?;
        let mut arrangement = Arrangement::new();
        arrangement.set_local_screens(local_screens);
        let edge = config.screens.first().map_or(ScreenEdge::Right, |s| s.edge);
        arrangement.set_transfer_edge(edge);

        let bind_addr: SocketAddr = format!("{}:{}", config.daemon.bind, config.daemon.port)
            .parse()
            .map_err(|e| DaemonError::Config(format!("invalid bind address: {e}")))?;
        let transport = TcpTransport::bind(bind_addr).await?;

        let discovery_rx = if config.daemon.discovery {
            discovery
                .advertise(peer_id, &config.identity.name, config.daemon.port)
                .await?;
            Some(discovery.browse(peer_id).await?)
        } else {
            None
        };

        let (command_tx, command_rx) = mpsc::channel(32);
        let engine = TransferEngine::new(arrangement, config.input.pointer_gain, config.input.bottom_up_y);
        let clipboard_enabled = config.clipboard.enabled;
        let transfer_edge = engine.arrangement().transfer_edge();

        let (status_tx, _) = watch::channel(DaemonStatus {
            link_state: LinkState::Listening,
            peer_info: None,
            engine_state: engine.state(),
            discovered_peers: Vec::new(),
            transfer_edge,
            clipboard_enabled,
        });

        Ok(Self {
            config,
            peer_id,
            driver,
            transport,
            discovery,
            discovery_rx,
            discovered: HashMap::new(),
            session: None,
            engine,
            clipboard: ClipboardBridge::new(),
            clipboard_enabled,
            link_state: LinkState::Listening,
            last_activity: Instant::now(),
            pending_ping: None,
            command_tx,
            command_rx,
            status_tx,
        })
    }

    /// A cloneable handle for issuing commands from outside the event loop.
    #[must_use]
    pub fn command_sender(&self) -> mpsc::Sender<DaemonCommand> {
        self.command_tx.clone()
    }

    /// The address this daemon's peer link listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, DaemonError> {
        Ok(self.transport.local_addr()?)
    }

    /// A watch receiver that observes every published status snapshot,
    /// starting from the current one.
    #[must_use]
    pub fn status_receiver(&self) -> watch::Receiver<DaemonStatus> {
        self.status_tx.subscribe()
    }

    #[must_use]
    pub fn status(&self) -> DaemonStatus {
        DaemonStatus {
            link_state: self.link_state,
            peer_info: self.session.as_ref().map(|s| s.peer.clone()),
            engine_state: self.engine.state(),
            discovered_peers: self.discovered.values().cloned().collect(),
            transfer_edge: self.engine.arrangement().transfer_edge(),
            clipboard_enabled: self.clipboard_enabled,
        }
    }

    fn publish_status(&self) {
        let _ = self.status_tx.send(self.status());
    }

    /// Run the event loop until a [`DaemonCommand::Shutdown`] is received.
    pub async fn run(&mut self) -> Result<(), DaemonError> {
        let mut poll_ticker = interval(POLL_INTERVAL);
        let mut clipboard_ticker = interval(edgelink_clipboard::CLIPBOARD_POLL);
        let mut keepalive_ticker = interval(PING_TIMEOUT);

        loop {
            tokio::select! {
                accepted = self.transport.accept() => {
                    if self.session.is_some() {
                        warn!("refusing incoming connection, a peer link is already active");
                    } else {
                        self.handle_incoming(accepted).await?;
                    }
                }
                event = recv_discovery(&mut self.discovery_rx) => {
                    self.handle_discovery_event(event);
                }
                frame = recv_session(&self.session) => {
                    self.handle_inbound_frame(frame).await?;
                }
                _ = poll_ticker.tick() => {
                    self.tick_engine().await?;
                }
                _ = clipboard_ticker.tick() => {
                    self.tick_clipboard().await?;
                }
                _ = keepalive_ticker.tick() => {
                    self.tick_keepalive().await?;
                }
                Some(command) = self.command_rx.recv() => {
                    if matches!(command, DaemonCommand::Shutdown) {
                        self.shutdown().await;
                        return Ok(());
                    }
                    self.handle_command(command).await?;
                }
            }
            self.publish_status();
        }
    }

    async fn handle_incoming(
        &mut self,
        accepted: Result<edgelink_protocol::PeerConnection, edgelink_protocol::ProtocolError>,
    ) -> Result<(), DaemonError> {
        let connection = accepted?;
        self.link_state = LinkState::Handshaking;
        let local_screens = self.driver.enumerate_screens().await?;
        match PeerSession::handshake_responder(
            connection,
            self.peer_id,
            &self.config.identity.name,
            &self.config.identity.platform,
            local_screens,
        )
        .await
        {
            Ok(session) => {
                self.engine.arrangement_mut().set_remote_screens(session.peer.screens.clone());
                self.link_state = LinkState::Ready;
                self.last_activity = Instant::now();
                self.pending_ping = None;
                self.session = Some(session);
            }
            Err(e) => {
                warn!(error = %e, "inbound handshake failed");
                self.link_state = LinkState::Listening;
            }
        }
        Ok(())
    }

    fn handle_discovery_event(&mut self, event: DiscoveryEvent) {
        match event {
            DiscoveryEvent::PeerFound(peer) => {
                debug!(name = %peer.name, id = %peer.id, "discovered peer");
                self.discovered.insert(peer.id, peer);
            }
            DiscoveryEvent::PeerLost(id) => {
                self.discovered.remove(&id);
            }
        }
    }

    async fn handle_inbound_frame(&mut self, frame: Result<Option<Message>, DaemonError>) -> Result<(), DaemonError> {
        let msg = match frame {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                info!("peer link closed by remote");
                self.drop_session_due_to_link_loss().await?;
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "peer link read failed");
                self.drop_session_due_to_link_loss().await?;
                return Ok(());
            }
        };
        self.last_activity = Instant::now();

        match &msg {
            Message::Ping {} => {
                if let Some(session) = &self.session {
                    session.pong().await?;
                }
            }
            Message::Pong {} => {
                self.pending_ping = None;
            }
            Message::Disconnect {} => {
                info!("peer requested disconnect");
                self.drop_session_due_to_link_loss().await?;
            }
            Message::ScreenInfo { screens } => {
                self.engine.arrangement_mut().set_remote_screens(screens.clone());
            }
            Message::ClipboardSync { data, .. } => {
                if self.clipboard_enabled {
                    self.clipboard.apply_inbound(&self.driver, data).await?;
                }
            }
            _ => {
                if let Some(session) = &self.session {
                    let sender = session.sender();
                    self.engine.handle_inbound(&mut self.driver, &sender, &msg).await?;
                }
            }
        }
        Ok(())
    }

    async fn tick_engine(&mut self) -> Result<(), DaemonError> {
        let Some(session) = &self.session else { return Ok(()) };
        let sender = session.sender();
        self.engine.tick(&mut self.driver, &sender).await?;
        Ok(())
    }

    async fn tick_clipboard(&mut self) -> Result<(), DaemonError> {
        if !self.clipboard_enabled {
            return Ok(());
        }
        let Some(session) = &self.session else { return Ok(()) };
        if let Some(content) = self.clipboard.poll(&self.driver).await? {
            let _ = session.sender().send(&Message::clipboard_sync(content)).await;
        }
        Ok(())
    }

    async fn tick_keepalive(&mut self) -> Result<(), DaemonError> {
        let Some(session) = &self.session else {
            self.pending_ping = None;
            return Ok(());
        };
        if let Some(sent_at) = self.pending_ping {
            if sent_at.elapsed() >= PING_TIMEOUT {
                warn!("peer link timed out waiting for pong");
                self.drop_session_due_to_link_loss().await?;
            }
        } else if self.last_activity.elapsed() >= IDLE_TIMEOUT {
            session.ping().await?;
            self.pending_ping = Some(Instant::now());
        }
        Ok(())
    }

    /// A bad command (dial failure, disconnect with nothing to disconnect)
    /// is reported via a `warn!` and otherwise swallowed — it must never
    /// take the whole event loop down.
    async fn handle_command(&mut self, command: DaemonCommand) -> Result<(), DaemonError> {
        match command {
            DaemonCommand::Connect(addr) => {
                if let Err(e) = self.connect_to(addr).await {
                    warn!(%addr, error = %e, "connect failed");
                    self.link_state = LinkState::Listening;
                }
            }
            DaemonCommand::Disconnect => {
                if let Err(e) = self.disconnect().await {
                    warn!(error = %e, "disconnect failed");
                }
            }
            DaemonCommand::SetTransferEdge(edge) => {
                self.engine.arrangement_mut().set_transfer_edge(edge);
            }
            DaemonCommand::SetClipboardEnabled(enabled) => {
                self.clipboard_enabled = enabled;
            }
            DaemonCommand::Shutdown => unreachable!("handled in run()"),
        }
        Ok(())
    }

    async fn connect_to(&mut self, addr: SocketAddr) -> Result<(), DaemonError> {
        if self.session.is_some() {
            warn!("already linked to a peer, ignoring connect command");
            return Ok(());
        }
        self.link_state = LinkState::Dialing;
        let connection = connect(addr).await?;
        let local_screens = self.driver.enumerate_screens().await?;
        let session = PeerSession::handshake_initiator(
            connection,
            self.peer_id,
            &self.config.identity.name,
            &self.config.identity.platform,
            local_screens,
        )
        .await?;
        self.engine.arrangement_mut().set_remote_screens(session.peer.screens.clone());
        self.link_state = LinkState::Ready;
        self.last_activity = Instant::now();
        self.pending_ping = None;
        self.session = Some(session);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), DaemonError> {
        let Some(mut session) = self.session.take() else {
            return Err(DaemonError::NoActiveLink);
        };
        self.engine.handle_link_lost(&mut self.driver).await?;
        session.disconnect().await?;
        self.link_state = LinkState::Listening;
        self.pending_ping = None;
        Ok(())
    }

    async fn drop_session_due_to_link_loss(&mut self) -> Result<(), DaemonError> {
        self.session = None;
        self.pending_ping = None;
        self.link_state = LinkState::Listening;
        self.engine.handle_link_lost(&mut self.driver).await?;
        Ok(())
    }

    async fn shutdown(&mut self) {
        if let Some(mut session) = self.session.take() {
            let _ = session.disconnect().await;
        }
        self.discovery.stop_advertising().await;
        self.discovery.stop_browsing().await;
        info!("daemon shut down");
    }
}

async fn recv_discovery(rx: &mut Option<mpsc::Receiver<DiscoveryEvent>>) -> DiscoveryEvent {
    loop {
        match rx {
            Some(r) => match r.recv().await {
                Some(event) => return event,
                None => *rx = None,
            },
            None => std::future::pending::<()>().await,
        }
    }
}

async fn recv_session(session: &Option<PeerSession>) -> Result<Option<Message>, DaemonError> {
    match session {
        Some(s) => s.recv().await,
        None => std::future::pending().await,
    }
}
