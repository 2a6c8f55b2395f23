//! Peer identity and the contracts between peers and the routing hub.

use crate::data::MidiData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque peer identifier, assigned by the router when a peer is registered.
///
/// Peers store their id to tag outgoing traffic; only the router interprets
/// it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub u32);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer:{}", self.0)
    }
}

/// Lifecycle edge a peer reports to the router.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeerEvent {
    Connected,
    Disconnected,
}

impl fmt::Display for PeerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerEvent::Connected => write!(f, "CONNECTED"),
            PeerEvent::Disconnected => write!(f, "DISCONNECTED"),
        }
    }
}

/// The dispatch hub, as seen by a peer adapter.
///
/// Adapters call these with their fixed [`PeerId`]; fan-out across the other
/// peers is entirely the router's business.
pub trait MidiRouter: Send + Sync {
    /// Inbound MIDI from `from`, exactly as received off that peer.
    fn send_midi(&self, from: PeerId, data: &MidiData);

    /// Lifecycle edge for `peer`.
    fn event(&self, peer: PeerId, event: PeerEvent);
}

/// A routed peer, as seen by the dispatch hub.
pub trait MidiPeer: Send + Sync {
    /// Deliver outbound MIDI through this peer. `from` identifies the
    /// router-side source; peers with a single downstream ignore it.
    fn send_midi(&self, from: PeerId, data: &MidiData);

    /// Structured snapshot for the control surface. Each peer kind reports
    /// its own connection details.
    fn status(&self) -> serde_json::Value;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_id_display() {
        assert_eq!(PeerId(7).to_string(), "peer:7");
    }

    #[test]
    fn test_peer_id_serializes_transparent() {
        let json = serde_json::to_string(&PeerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_peer_event_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&PeerEvent::Connected).unwrap(),
            "\"CONNECTED\""
        );
        assert_eq!(
            serde_json::to_string(&PeerEvent::Disconnected).unwrap(),
            "\"DISCONNECTED\""
        );
    }
}
