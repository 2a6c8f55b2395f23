//! Router-side adapter for one network MIDI peer.
//!
//! [`NetworkMidiClient`] bridges a [`PeerSession`] to the routing hub:
//! inbound packets and lifecycle edges flow up as router calls, outbound
//! MIDI flows down into the session's wire queue. Pure forwarding -- the
//! protocol state machine stays in the session.

use crate::session::{PeerSession, PeerStatus, SocketTarget};
use midilink_core::{MidiData, MidiPeer, MidiRouter, PeerEvent, PeerId, Subscription};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Introspection snapshot produced by [`NetworkMidiClient::status`].
#[derive(Clone, Debug, Serialize)]
pub struct StatusDescriptor {
    /// Display name of the peer: the remote's announced name once known.
    pub name: String,
    pub peer: PeerDetails,
}

/// Session-level connection details inside a [`StatusDescriptor`].
#[derive(Clone, Debug, Serialize)]
pub struct PeerDetails {
    pub status: PeerStatus,
    pub local_name: String,
    pub remote_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<SocketTarget>,
    pub sent: u64,
    pub received: u64,
}

/// Which lifecycle edge was last forwarded to the router.
///
/// The router's vocabulary is edges, so repeated notifications of the same
/// class must not manufacture edges the session never made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ForwardedEdge {
    None,
    Connected,
    Disconnected,
}

/// Bridge between one [`PeerSession`] and the routing hub.
///
/// The session association is fixed at construction and never reassigned.
/// Dropping the client drops both signal subscriptions, so no further
/// session callback reaches this instance; the session itself survives as
/// long as other owners hold it.
pub struct NetworkMidiClient {
    session: Arc<PeerSession>,
    peer_id: PeerId,
    _midi_subscription: Subscription,
    _status_subscription: Subscription,
}

impl NetworkMidiClient {
    /// Bridge an existing session to `router` as `peer_id`.
    ///
    /// Installs both subscriptions before returning, so no session event is
    /// missed once the caller sees the client.
    pub fn new(router: Arc<dyn MidiRouter>, peer_id: PeerId, session: Arc<PeerSession>) -> Self {
        let midi_subscription = {
            let router = Arc::clone(&router);
            session.midi_event.connect(move |bytes: &[u8]| {
                router.send_midi(peer_id, &MidiData::new(bytes));
            })
        };

        let status_subscription = {
            // Weak, or the session would own a listener that owns the session.
            let weak_session = Arc::downgrade(&session);
            let last_edge = Mutex::new(ForwardedEdge::None);
            session.status_event.connect(move |status: &PeerStatus| {
                let remote = weak_session
                    .upgrade()
                    .map(|s| s.remote_name())
                    .unwrap_or_default();
                debug!(%peer_id, %status, remote = %remote, "peer status changed");

                let mut last = last_edge.lock();
                if *status == PeerStatus::Connected {
                    if *last != ForwardedEdge::Connected {
                        *last = ForwardedEdge::Connected;
                        router.event(peer_id, PeerEvent::Connected);
                    }
                } else if status.is_terminal() && *last != ForwardedEdge::Disconnected {
                    *last = ForwardedEdge::Disconnected;
                    router.event(peer_id, PeerEvent::Disconnected);
                }
                // Initial / Connecting: nothing to tell the router yet.
            })
        };

        Self {
            session,
            peer_id,
            _midi_subscription: midi_subscription,
            _status_subscription: status_subscription,
        }
    }

    /// Create a session named `name`, bridge it, and point it at
    /// `hostname:port`.
    ///
    /// Returns as soon as the target is configured; establishment proceeds
    /// in the transport and its outcome arrives through the status
    /// subscription.
    pub fn connect_to(
        router: Arc<dyn MidiRouter>,
        peer_id: PeerId,
        name: impl Into<String>,
        hostname: impl Into<String>,
        port: u16,
    ) -> Self {
        let session = Arc::new(PeerSession::new(name));
        let client = Self::new(router, peer_id, session);
        client.session.add_server_address(hostname, port);
        client
    }

    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    pub fn session(&self) -> &Arc<PeerSession> {
        &self.session
    }

    /// Read-only introspection snapshot. Safe to call at any time; never
    /// mutates adapter or session state.
    pub fn status(&self) -> StatusDescriptor {
        let stats = self.session.stats();
        StatusDescriptor {
            name: self.session.remote_name(),
            peer: PeerDetails {
                status: self.session.status(),
                local_name: self.session.name().to_string(),
                remote_name: self.session.remote_name(),
                target: self.session.target(),
                sent: stats.sent,
                received: stats.received,
            },
        }
    }
}

impl MidiPeer for NetworkMidiClient {
    /// Forward router traffic to the wire, unmodified. `from` plays no
    /// routing role here: this peer has exactly one downstream session.
    /// Delivery failure is not surfaced to the router; it shows up later as
    /// a status transition.
    fn send_midi(&self, _from: PeerId, data: &MidiData) {
        if let Err(err) = self.session.send_midi(data) {
            warn!(peer = %self.peer_id, %err, "outbound MIDI dropped");
        }
    }

    fn status(&self) -> serde_json::Value {
        serde_json::to_value(self.status()).unwrap_or(serde_json::Value::Null)
    }
}

impl std::fmt::Debug for NetworkMidiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkMidiClient")
            .field("peer_id", &self.peer_id)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
