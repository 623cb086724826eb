//! Peer link framing over a single TCP stream.
//!
//! A [`PeerConnection`] owns one TCP socket split into a buffered line
//! reader and a write half guarded by a mutex, so the engine and the
//! clipboard bridge can both send frames without interleaving partial
//! writes (spec.md §4.2, §6).

use std::net::SocketAddr;
use std::sync::Arc;

use edgelink_types::Message;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::trace;

use crate::error::ProtocolError;
use crate::wire::{decode_message, encode_message, MAX_FRAME_SIZE};

/// A live connection to a remote edgelink peer.
pub struct PeerConnection {
    remote_addr: SocketAddr,
    reader: Mutex<BufReader<tokio::net::tcp::OwnedReadHalf>>,
    writer: Arc<Mutex<tokio::net::tcp::OwnedWriteHalf>>,
}

impl PeerConnection {
    /// Wrap an already-connected TCP stream. Sets `TCP_NODELAY` so small,
    /// latency-sensitive frames (mouse moves, keys) are not batched by
    /// Nagle's algorithm.
    pub fn new(stream: TcpStream) -> Result<Self, ProtocolError> {
        stream
            .set_nodelay(true)
            .map_err(|e| ProtocolError::Connection(e.to_string()))?;
        let remote_addr = stream
            .peer_addr()
            .map_err(|e| ProtocolError::Connection(e.to_string()))?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            remote_addr,
            reader: Mutex::new(BufReader::new(read_half)),
            writer: Arc::new(Mutex::new(write_half)),
        })
    }

    #[must_use]
    pub fn remote_address(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Send a single message frame. Safe to call concurrently from
    /// multiple tasks; writes are serialised.
    pub async fn send(&self, msg: &Message) -> Result<(), ProtocolError> {
        let bytes = encode_message(msg)?;
        let mut writer = self.writer.lock().await;
        writer
            .write_all(&bytes)
            .await
            .map_err(|e| ProtocolError::Connection(e.to_string()))?;
        trace!(len = bytes.len(), "sent frame");
        Ok(())
    }

    /// Receive the next message frame.
    ///
    /// Returns `Ok(None)` if the peer closed the connection cleanly
    /// (EOF with no partial line pending).
    pub async fn recv(&self) -> Result<Option<Message>, ProtocolError> {
        let mut reader = self.reader.lock().await;
        let mut line = Vec::new();
        let n = reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(|e| ProtocolError::Connection(e.to_string()))?;
        if n == 0 {
            return Ok(None);
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if line.len() > MAX_FRAME_SIZE {
            return Err(ProtocolError::Deserialization(format!(
                "frame size {} exceeds maximum {MAX_FRAME_SIZE}",
                line.len()
            )));
        }
        decode_message(&line).map(Some)
    }

    /// A cloneable handle for sending frames from another task, without
    /// needing access to the receive half.
    #[must_use]
    pub fn sender(&self) -> MessageSender {
        MessageSender {
            writer: Arc::clone(&self.writer),
        }
    }
}

/// A lightweight send-only handle to a [`PeerConnection`].
#[derive(Clone)]
pub struct MessageSender {
    writer: Arc<Mutex<tokio::net::tcp::OwnedWriteHalf>>,
}

impl MessageSender {
    pub async fn send(&self, msg: &Message) -> Result<(), ProtocolError> {
        let bytes = encode_message(msg)?;
        let mut writer = self.writer.lock().await;
        writer
            .write_all(&bytes)
            .await
            .map_err(|e| ProtocolError::Connection(e.to_string()))?;
        Ok(())
    }
}
