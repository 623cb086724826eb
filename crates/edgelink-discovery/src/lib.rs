//! UDP broadcast presence discovery for edgelink.
//!
//! Defines the [`Discovery`] trait, kept in the advertise/browse shape the
//! teacher used for its mDNS design, now backed by a periodic broadcast
//! advertiser and a passive listener (spec.md §4.3) instead of DNS-SD.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use edgelink_types::peer::PeerId;
use serde::{Deserialize, Serialize};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

pub mod error;

pub use error::DiscoveryError;

/// UDP port used for discovery broadcasts.
pub const DISCOVERY_PORT: u16 = 52526;

/// How often an instance broadcasts its presence.
pub const ANNOUNCE_INTERVAL: Duration = Duration::from_secs(3);

/// How long a peer entry survives without a fresh announcement.
pub const PEER_TTL: Duration = Duration::from_secs(ANNOUNCE_INTERVAL.as_secs() * 3);

/// The datagram broadcast by [`UdpDiscovery::advertise`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Announce {
    id: PeerId,
    name: String,
    ip: IpAddr,
    port: u16,
    platform: String,
}

/// A peer surfaced by the discovery listener.
#[derive(Debug, Clone)]
pub struct DiscoveredPeer {
    pub id: PeerId,
    pub name: String,
    pub ip: IpAddr,
    pub port: u16,
    pub platform: String,
}

/// Events from the discovery subsystem.
#[derive(Debug, Clone)]
pub enum DiscoveryEvent {
    PeerFound(DiscoveredPeer),
    PeerLost(PeerId),
}

/// Network discovery for edgelink peers.
#[async_trait]
pub trait Discovery: Send + 'static {
    /// Start broadcasting this instance's presence every `ANNOUNCE_INTERVAL`.
    async fn advertise(&mut self, id: PeerId, name: &str, port: u16) -> Result<(), DiscoveryError>;

    /// Stop broadcasting.
    async fn stop_advertising(&mut self);

    /// Start listening for announcements, publishing events to the returned
    /// receiver. `local_id` is filtered out of published events — a running
    /// advertiser's own broadcasts land on the same listening socket.
    async fn browse(&mut self, local_id: PeerId) -> Result<mpsc::Receiver<DiscoveryEvent>, DiscoveryError>;

    /// Stop listening.
    async fn stop_browsing(&mut self);
}

/// Determine the local LAN address by connecting a UDP socket to an
/// unreachable address and reading back the chosen source address.
/// Sends no packets; the "connect" call on a `SOCK_DGRAM` socket only
/// selects a route.
async fn local_ip() -> Result<IpAddr, DiscoveryError> {
    let probe = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .await
        .map_err(|e| DiscoveryError::Bind(e.to_string()))?;
    probe
        .connect((Ipv4Addr::new(8, 8, 8, 8), 80))
        .await
        .map_err(|e| DiscoveryError::Bind(e.to_string()))?;
    probe
        .local_addr()
        .map(|a| a.ip())
        .map_err(|e| DiscoveryError::Bind(e.to_string()))
}

/// UDP broadcast implementation of [`Discovery`].
#[derive(Default)]
pub struct UdpDiscovery {
    advertiser: Option<JoinHandle<()>>,
    listener: Option<JoinHandle<()>>,
}

impl UdpDiscovery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Discovery for UdpDiscovery {
    async fn advertise(&mut self, id: PeerId, name: &str, port: u16) -> Result<(), DiscoveryError> {
        self.stop_advertising().await;

        let ip = local_ip().await?;
        let announce = Announce {
            id,
            name: name.to_string(),
            ip,
            port,
            platform: std::env::consts::OS.to_string(),
        };

        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .map_err(|e| DiscoveryError::Bind(e.to_string()))?;
        socket
            .set_broadcast(true)
            .map_err(|e| DiscoveryError::Bind(e.to_string()))?;

        let dest = SocketAddr::from((Ipv4Addr::BROADCAST, DISCOVERY_PORT));
        let payload = serde_json::to_vec(&announce)
            .map_err(|e| DiscoveryError::Malformed(e.to_string()))?;

        debug!(%id, %name, %port, "starting discovery advertiser");
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(ANNOUNCE_INTERVAL);
            loop {
                ticker.tick().await;
                if let Err(e) = socket.send_to(&payload, dest).await {
                    warn!(error = %e, "discovery broadcast send failed");
                }
            }
        });
        self.advertiser = Some(handle);
        Ok(())
    }

    async fn stop_advertising(&mut self) {
        if let Some(handle) = self.advertiser.take() {
            handle.abort();
        }
    }

    async fn browse(&mut self, local_id: PeerId) -> Result<mpsc::Receiver<DiscoveryEvent>, DiscoveryError> {
        self.stop_browsing().await;

        let self_id_socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, DISCOVERY_PORT))
            .await
            .map_err(|e| DiscoveryError::Bind(e.to_string()))?;

        let (tx, rx) = mpsc::channel(32);
        debug!("starting discovery listener");
        let handle = tokio::spawn(async move {
            let mut seen: HashMap<PeerId, Instant> = HashMap::new();
            let mut buf = [0u8; 2048];
            let mut age_check = tokio::time::interval(ANNOUNCE_INTERVAL);

            loop {
                tokio::select! {
                    res = self_id_socket.recv_from(&mut buf) => {
                        let Ok((n, _from)) = res else { continue };
                        let Ok(announce) = serde_json::from_slice::<Announce>(&buf[..n]) else {
                            trace!("dropped malformed announce datagram");
                            continue;
                        };
                        if announce.id == local_id {
                            continue;
                        }
                        let first_seen = !seen.contains_key(&announce.id);
                        seen.insert(announce.id, Instant::now());
                        if first_seen {
                            let peer = DiscoveredPeer {
                                id: announce.id,
                                name: announce.name,
                                ip: announce.ip,
                                port: announce.port,
                                platform: announce.platform,
                            };
                            if tx.send(DiscoveryEvent::PeerFound(peer)).await.is_err() {
                                return;
                            }
                        }
                    }
                    _ = age_check.tick() => {
                        let now = Instant::now();
                        let expired: Vec<PeerId> = seen
                            .iter()
                            .filter(|(_, last)| now.duration_since(**last) > PEER_TTL)
                            .map(|(id, _)| *id)
                            .collect();
                        for id in expired {
                            seen.remove(&id);
                            if tx.send(DiscoveryEvent::PeerLost(id)).await.is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        });
        self.listener = Some(handle);
        Ok(rx)
    }

    async fn stop_browsing(&mut self) {
        if let Some(handle) = self.listener.take() {
            handle.abort();
        }
    }
}

impl Drop for UdpDiscovery {
    fn drop(&mut self) {
        if let Some(handle) = self.advertiser.take() {
            handle.abort();
        }
        if let Some(handle) = self.listener.take() {
            handle.abort();
        }
    }
}
