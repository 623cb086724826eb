//! Daemon errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("already running")]
    AlreadyRunning,

    #[error("not running")]
    NotRunning,

    #[error("no active peer link")]
    NoActiveLink,

    #[error("protocol error: {0}")]
    Protocol(#[from] edgelink_protocol::ProtocolError),

    #[error("input error: {0}")]
    Input(#[from] edgelink_input::InputError),

    #[error("clipboard error: {0}")]
    Clipboard(#[from] edgelink_clipboard::ClipboardError),

    #[error("discovery error: {0}")]
    Discovery(#[from] edgelink_discovery::DiscoveryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
