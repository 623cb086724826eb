//! Core daemon for edgelink.
//!
//! Owns the Session Controller ([`daemon::Daemon`]), the transfer engine
//! state machine ([`engine::TransferEngine`]), peer link handshake/keep-alive
//! ([`session::PeerSession`]), and config/identity loading ([`setup`]).

pub mod config;
pub mod daemon;
pub mod engine;
pub mod error;
pub mod session;
pub mod setup;
pub mod state;

pub use config::Config;
pub use daemon::{Daemon, DaemonCommand, DaemonStatus};
pub use engine::EngineState;
pub use error::DaemonError;
