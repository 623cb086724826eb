//! Peer identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::screen::Screen;

/// Unique identifier for a peer in the edgelink network.
///
/// Wraps a UUID v4, serialised as its canonical string form on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(Uuid);

impl PeerId {
    /// Generate a new random peer ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `{id, name, platform, ip, port, screens[]}` — spec.md §3 "Peer".
///
/// Created on hello from either side, destroyed on disconnect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Peer {
    pub id: PeerId,
    pub name: String,
    /// Free-form platform label, e.g. `"linux"`, `"mac"`, `"windows"`.
    pub platform: String,
    pub ip: std::net::IpAddr,
    pub port: u16,
    pub screens: Vec<Screen>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_id_unique() {
        assert_ne!(PeerId::new(), PeerId::new());
    }

    #[test]
    fn peer_id_display_is_uuid() {
        let id = PeerId::new();
        assert_eq!(id.to_string().len(), 36);
    }

    #[test]
    fn peer_id_serde_roundtrip() {
        let id = PeerId::new();
        let json = serde_json::to_string(&id).unwrap();
        let decoded: PeerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, decoded);
    }
}
