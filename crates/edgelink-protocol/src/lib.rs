//! Peer link transport and wire protocol for edgelink.
//!
//! This crate handles TCP connection management, newline-delimited JSON
//! framing, and the link state machine. The handshake and keep-alive
//! policy live in `edgelink-daemon`, which drives this crate's primitives.

pub mod connection;
pub mod error;
pub mod state;
pub mod transport;
pub mod wire;

pub use connection::{MessageSender, PeerConnection};
pub use error::ProtocolError;
pub use state::LinkState;
pub use transport::{connect, TcpTransport, DEFAULT_PORT};
