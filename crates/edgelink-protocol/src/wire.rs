//! Wire format: newline-delimited JSON frames.
//!
//! Each message on the wire is a single-line JSON object followed by `\n`:
//! `{"type": "...", "payload": {...}}\n`. There is no length prefix; the
//! newline is the frame boundary (spec.md §4.2, §6).

use edgelink_types::Message;

use crate::error::ProtocolError;

/// Maximum line length accepted from a peer (1 MiB). Prevents a
/// misbehaving or malicious peer from growing an unbounded read buffer.
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Encode a message as a single newline-terminated JSON line.
pub fn encode_message(msg: &Message) -> Result<Vec<u8>, ProtocolError> {
    let mut line = serde_json::to_vec(msg).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
    if line.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::Serialization(format!(
            "message size {} exceeds maximum {MAX_FRAME_SIZE}",
            line.len()
        )));
    }
    line.push(b'\n');
    Ok(line)
}

/// Decode a message from one line's worth of bytes (newline already stripped).
pub fn decode_message(line: &[u8]) -> Result<Message, ProtocolError> {
    if line.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::Deserialization(format!(
            "message size {} exceeds maximum {MAX_FRAME_SIZE}",
            line.len()
        )));
    }
    serde_json::from_slice(line).map_err(|e| ProtocolError::Deserialization(e.to_string()))
}
