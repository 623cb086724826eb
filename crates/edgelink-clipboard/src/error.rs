//! Clipboard bridge errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard access failed: {0}")]
    Access(#[from] edgelink_input::InputError),
}
