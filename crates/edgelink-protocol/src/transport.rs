//! TCP transport: bind, accept, and connect.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

use crate::connection::PeerConnection;
use crate::error::ProtocolError;

/// Default peer link port (spec.md §4.2).
pub const DEFAULT_PORT: u16 = 52525;

/// TCP transport for the edgelink peer link.
///
/// A single listener accepts at most one active connection at a time;
/// the Session Controller is responsible for refusing extra incoming
/// connections while one is already `Ready` (spec.md §4.2).
pub struct TcpTransport {
    listener: TcpListener,
}

impl TcpTransport {
    /// Bind a TCP listener on `addr`.
    pub async fn bind(addr: SocketAddr) -> Result<Self, ProtocolError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ProtocolError::Connection(e.to_string()))?;
        info!(addr = %addr, "peer link listener bound");
        Ok(Self { listener })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ProtocolError> {
        self.listener
            .local_addr()
            .map_err(|e| ProtocolError::Connection(e.to_string()))
    }

    /// Accept one incoming connection.
    pub async fn accept(&self) -> Result<PeerConnection, ProtocolError> {
        let (stream, remote) = self
            .listener
            .accept()
            .await
            .map_err(|e| ProtocolError::Connection(e.to_string()))?;
        debug!(remote = %remote, "accepted peer link connection");
        PeerConnection::new(stream)
    }
}

/// Dial a remote peer's listener.
pub async fn connect(addr: SocketAddr) -> Result<PeerConnection, ProtocolError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| ProtocolError::Connection(e.to_string()))?;
    debug!(remote = %addr, "connected to peer");
    PeerConnection::new(stream)
}
