//! Peer link session: handshake and keep-alive over one [`PeerConnection`]
//! (spec.md §4.2, §3 "Peer").

use std::time::Duration;

use edgelink_protocol::{MessageSender, PeerConnection, ProtocolError};
use edgelink_types::{Message, Peer, PeerId, Screen, PROTOCOL_VERSION};
use tracing::{debug, info};

use crate::error::DaemonError;
use crate::state::SessionState;

/// How long a link may sit without any traffic before it's considered dead.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(10);
/// How long to wait for a `pong` after sending `ping` before giving up.
pub const PING_TIMEOUT: Duration = Duration::from_secs(3);

/// A session with the single active peer (spec.md Non-goal: strictly one
/// active peer at a time).
pub struct PeerSession {
    pub peer: Peer,
    pub state: SessionState,
    connection: PeerConnection,
}

impl PeerSession {
    /// Wrap a freshly accepted or dialed connection. The handshake still
    /// needs to run before `peer` is meaningful; callers must discard this
    /// session if the handshake fails.
    fn new(connection: PeerConnection, peer: Peer) -> Self {
        Self { peer, state: SessionState::Connected, connection }
    }

    /// A send-only handle, for handing to the transfer engine or clipboard
    /// bridge without giving them the receive half.
    #[must_use]
    pub fn sender(&self) -> MessageSender {
        self.connection.sender()
    }

    /// Receive the next frame on this link.
    pub async fn recv(&self) -> Result<Option<Message>, DaemonError> {
        Ok(self.connection.recv().await?)
    }

    /// Dialing side of the handshake: send our `hello` right after connecting,
    /// then send `connected` once the peer's `hello` arrives, and become
    /// `Ready` only once the peer's own `connected` arrives in turn.
    pub async fn handshake_initiator(
        connection: PeerConnection,
        our_id: PeerId,
        our_name: &str,
        our_platform: &str,
        our_screens: Vec<Screen>,
    ) -> Result<Self, DaemonError> {
        Self::run_handshake(connection, our_id, our_name, our_platform, our_screens, "initiator").await
    }

    /// Accepting side of the handshake: send our `hello` immediately on
    /// accept, then send `connected` once the peer's `hello` arrives, and
    /// become `Ready` only once the peer's own `connected` arrives in turn.
    pub async fn handshake_responder(
        connection: PeerConnection,
        our_id: PeerId,
        our_name: &str,
        our_platform: &str,
        our_screens: Vec<Screen>,
    ) -> Result<Self, DaemonError> {
        Self::run_handshake(connection, our_id, our_name, our_platform, our_screens, "responder").await
    }

    /// The symmetric 4-message handshake shared by both sides (spec.md
    /// §4.2 steps 1-4): each side sends its own `hello` without waiting on
    /// the other, replies `connected` as soon as the peer's `hello` is read,
    /// and only transitions to `Ready` on receiving the peer's `connected`.
    async fn run_handshake(
        connection: PeerConnection,
        our_id: PeerId,
        our_name: &str,
        our_platform: &str,
        our_screens: Vec<Screen>,
        role: &'static str,
    ) -> Result<Self, DaemonError> {
        let addr = connection.remote_address();
        let mut session = Self::new(connection, placeholder_peer(&addr));

        session
            .connection
            .send(&Message::Hello {
                version: PROTOCOL_VERSION,
                id: our_id,
                name: our_name.to_string(),
                platform: our_platform.to_string(),
                screens: our_screens.clone(),
            })
            .await?;
        session.state = SessionState::HelloSent;
        debug!(role, "sent hello");

        let mut got_hello = false;
        loop {
            let msg = session
                .connection
                .recv()
                .await?
                .ok_or(ProtocolError::StreamClosed)?;

            match msg {
                Message::Hello { version, id, name, platform, screens } if !got_hello => {
                    verify_version(version)?;
                    session.peer = Peer {
                        id,
                        name: name.clone(),
                        platform,
                        ip: session.connection.remote_address().ip(),
                        port: session.connection.remote_address().port(),
                        screens,
                    };
                    got_hello = true;
                    session
                        .connection
                        .send(&Message::Connected {
                            version: PROTOCOL_VERSION,
                            id: our_id,
                            name: our_name.to_string(),
                            platform: our_platform.to_string(),
                            screens: our_screens.clone(),
                        })
                        .await?;
                    debug!(role, peer = %name, "sent connected");
                }
                Message::Connected { version, id, name, platform, screens } if got_hello => {
                    verify_version(version)?;
                    session.peer = Peer {
                        id,
                        name: name.clone(),
                        platform,
                        ip: session.connection.remote_address().ip(),
                        port: session.connection.remote_address().port(),
                        screens,
                    };
                    session.state = SessionState::Ready;
                    info!(role, peer = %name, %id, "handshake complete");
                    return Ok(session);
                }
                other => {
                    return Err(DaemonError::Protocol(ProtocolError::Handshake(format!(
                        "unexpected message during handshake: {other:?}"
                    ))))
                }
            }
        }
    }

    /// Send `ping`.
    pub async fn ping(&self) -> Result<(), DaemonError> {
        Ok(self.connection.send(&Message::Ping {}).await?)
    }

    /// Send `pong` in reply to an inbound `ping`.
    pub async fn pong(&self) -> Result<(), DaemonError> {
        Ok(self.connection.send(&Message::Pong {}).await?)
    }

    /// Send `disconnect` and mark this session as tearing down.
    pub async fn disconnect(&mut self) -> Result<(), DaemonError> {
        self.state = SessionState::Disconnecting;
        let _ = self.connection.send(&Message::Disconnect {}).await;
        info!(peer = %self.peer.name, "disconnected");
        Ok(())
    }
}

/// A placeholder `Peer` filled in once the handshake message arrives; never
/// observed by callers since both handshake functions only return `Ok`
/// after replacing every field.
fn placeholder_peer(addr: &std::net::SocketAddr) -> Peer {
    Peer {
        id: PeerId::new(),
        name: String::new(),
        platform: String::new(),
        ip: addr.ip(),
        port: addr.port(),
        screens: Vec::new(),
    }
}

fn verify_version(remote: edgelink_types::message::ProtocolVersion) -> Result<(), DaemonError> {
    if remote.major != PROTOCOL_VERSION.major {
        return Err(DaemonError::Protocol(ProtocolError::VersionMismatch {
            remote: remote.to_string(),
            local: PROTOCOL_VERSION.to_string(),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgelink_types::screen::ScreenOwner;
    use tokio::net::{TcpListener, TcpStream};

    fn screens(name: &str) -> Vec<Screen> {
        vec![Screen {
            id: format!("{name}-0"),
            name: name.to_string(),
            origin_x: 0,
            origin_y: 0,
            width: 1920,
            height: 1080,
            is_primary: true,
            owner: ScreenOwner::Local,
        }]
    }

    /// Drives `handshake_initiator` against a hand-scripted peer so the
    /// actual message sequence — not just the end state — is observed: the
    /// initiator must send its own `hello` before receiving anything, reply
    /// `connected` only after the peer's `hello` arrives, and only reach
    /// `Ready` once the peer's own `connected` arrives in turn.
    #[tokio::test]
    async fn initiator_completes_full_four_message_exchange() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let initiator_id = PeerId::new();
        let initiator = tokio::spawn(async move {
            let stream = TcpStream::connect(addr).await.unwrap();
            let connection = PeerConnection::new(stream).unwrap();
            PeerSession::handshake_initiator(connection, initiator_id, "initiator", "linux", screens("initiator"))
                .await
                .unwrap()
        });

        let (stream, _) = listener.accept().await.unwrap();
        let fake_peer = PeerConnection::new(stream).unwrap();

        let hello = fake_peer.recv().await.unwrap().unwrap();
        let Message::Hello { name, .. } = hello else {
            panic!("expected hello first, got {hello:?}");
        };
        assert_eq!(name, "initiator");

        let peer_id = PeerId::new();
        fake_peer
            .send(&Message::Hello {
                version: PROTOCOL_VERSION,
                id: peer_id,
                name: "fake-peer".to_string(),
                platform: "linux".to_string(),
                screens: screens("fake-peer"),
            })
            .await
            .unwrap();

        let reply = fake_peer.recv().await.unwrap().unwrap();
        let Message::Connected { name, .. } = reply else {
            panic!("expected connected in reply to our hello, got {reply:?}");
        };
        assert_eq!(name, "initiator");

        fake_peer
            .send(&Message::Connected {
                version: PROTOCOL_VERSION,
                id: peer_id,
                name: "fake-peer".to_string(),
                platform: "linux".to_string(),
                screens: screens("fake-peer"),
            })
            .await
            .unwrap();

        let session = initiator.await.unwrap();
        assert_eq!(session.state, SessionState::Ready);
        assert_eq!(session.peer.name, "fake-peer");
        assert_eq!(session.peer.id, peer_id);
    }
}
