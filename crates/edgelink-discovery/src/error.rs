//! Discovery subsystem errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to bind discovery socket: {0}")]
    Bind(String),

    #[error("broadcast send failed: {0}")]
    Send(String),

    #[error("malformed announce datagram: {0}")]
    Malformed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
