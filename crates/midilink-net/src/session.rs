//! One live network peer connection, as seen from the router process.
//!
//! The wire protocol stack owns the socket and drives the session through
//! [`PeerSession::receive_midi`] and [`PeerSession::set_status`]; adapters
//! observe the public signals and feed the outbound queue. Connection state
//! lives here and nowhere else.

use crate::error::{Error, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use midilink_core::{MidiData, Signal};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

const DEFAULT_OUTBOUND_CAPACITY: usize = 1024;

/// Connection state of a peer session, ordered from fresh to dead.
///
/// Everything at or beyond [`PeerStatus::Disconnected`] is terminal; the
/// later variants record why the connection died. The ordering is part of
/// the contract: `status >= Disconnected` is the disconnection test, so new
/// terminal variants must sort after `Disconnected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeerStatus {
    /// Fresh session, no connection attempt observed yet.
    Initial,
    /// Handshake in progress.
    Connecting,
    /// Both control and data channels are up.
    Connected,
    /// Clean shutdown by either side.
    Disconnected,
    /// The remote refused the connection.
    ConnectionRejected,
    /// The connection attempt timed out.
    ConnectTimeout,
    /// The transport died underneath an established connection.
    NetworkError,
}

impl PeerStatus {
    /// True for any state at or beyond [`PeerStatus::Disconnected`].
    #[inline]
    pub fn is_terminal(self) -> bool {
        self >= PeerStatus::Disconnected
    }
}

impl fmt::Display for PeerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeerStatus::Initial => "INITIAL",
            PeerStatus::Connecting => "CONNECTING",
            PeerStatus::Connected => "CONNECTED",
            PeerStatus::Disconnected => "DISCONNECTED",
            PeerStatus::ConnectionRejected => "CONNECTION_REJECTED",
            PeerStatus::ConnectTimeout => "CONNECT_TIMEOUT",
            PeerStatus::NetworkError => "NETWORK_ERROR",
        };
        f.write_str(name)
    }
}

/// Connection target recorded by [`PeerSession::add_server_address`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketTarget {
    pub hostname: String,
    pub port: u16,
}

impl fmt::Display for SocketTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

/// Packet counters for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub sent: u64,
    pub received: u64,
}

/// One live network MIDI connection.
///
/// `Arc`-shared between the wire protocol stack and whatever bridges it to
/// the router; it is torn down only when the last owner releases it.
pub struct PeerSession {
    local_name: String,
    remote_name: Mutex<Option<String>>,
    status: Mutex<PeerStatus>,
    target: Mutex<Option<SocketTarget>>,
    sent: AtomicU64,
    received: AtomicU64,
    outbound_tx: Sender<Vec<u8>>,
    outbound_rx: Mutex<Option<Receiver<Vec<u8>>>>,

    /// Fired once per MIDI packet received off the wire, with the bytes
    /// exactly as the transport framed them.
    pub midi_event: Signal<[u8]>,
    /// Fired on every connection status transition, in transition order.
    pub status_event: Signal<PeerStatus>,
}

impl PeerSession {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_outbound_capacity(name, DEFAULT_OUTBOUND_CAPACITY)
    }

    pub fn with_outbound_capacity(name: impl Into<String>, capacity: usize) -> Self {
        let (outbound_tx, outbound_rx) = bounded(capacity);
        Self {
            local_name: name.into(),
            remote_name: Mutex::new(None),
            status: Mutex::new(PeerStatus::Initial),
            target: Mutex::new(None),
            sent: AtomicU64::new(0),
            received: AtomicU64::new(0),
            outbound_tx,
            outbound_rx: Mutex::new(Some(outbound_rx)),
            midi_event: Signal::new(),
            status_event: Signal::new(),
        }
    }

    /// Name this end announces on the wire.
    pub fn name(&self) -> &str {
        &self.local_name
    }

    /// Name the remote peer announced during the handshake, or the local
    /// name while that is still unknown.
    pub fn remote_name(&self) -> String {
        self.remote_name
            .lock()
            .clone()
            .unwrap_or_else(|| self.local_name.clone())
    }

    /// Wire side: the handshake learned the remote's name.
    pub fn set_remote_name(&self, name: impl Into<String>) {
        *self.remote_name.lock() = Some(name.into());
    }

    pub fn status(&self) -> PeerStatus {
        *self.status.lock()
    }

    pub fn target(&self) -> Option<SocketTarget> {
        self.target.lock().clone()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            sent: self.sent.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
        }
    }

    /// Record the destination for the outbound connection. Establishment is
    /// the transport's job; observers learn the outcome through
    /// [`PeerSession::status_event`].
    pub fn add_server_address(&self, hostname: impl Into<String>, port: u16) {
        let target = SocketTarget {
            hostname: hostname.into(),
            port,
        };
        debug!(name = %self.local_name, addr = %target, "peer target configured");
        *self.target.lock() = Some(target);
    }

    /// Wire side: a MIDI packet arrived. Fires [`PeerSession::midi_event`]
    /// without copying the bytes.
    pub fn receive_midi(&self, bytes: &[u8]) {
        self.received.fetch_add(1, Ordering::Relaxed);
        self.midi_event.emit(bytes);
    }

    /// Wire side: the connection state moved. Records the new status and
    /// fires [`PeerSession::status_event`] exactly once, in call order.
    pub fn set_status(&self, status: PeerStatus) {
        *self.status.lock() = status;
        self.status_event.emit(&status);
    }

    /// Queue one outbound MIDI packet for the wire side to send.
    ///
    /// Never blocks: a full queue returns [`Error::OutboundQueueFull`] and
    /// the packet is dropped.
    pub fn send_midi(&self, data: &MidiData) -> Result<()> {
        match self.outbound_tx.try_send(data.as_bytes().to_vec()) {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(Error::OutboundQueueFull(data.len())),
            Err(TrySendError::Disconnected(_)) => Err(Error::SessionClosed),
        }
    }

    /// Hand the outbound drain end to the wire side. Yields `None` after the
    /// first call. Dropping the receiver closes the queue; later sends
    /// report [`Error::SessionClosed`].
    pub fn take_outbound_receiver(&self) -> Option<Receiver<Vec<u8>>> {
        self.outbound_rx.lock().take()
    }
}

impl fmt::Debug for PeerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerSession")
            .field("local_name", &self.local_name)
            .field("status", &self.status())
            .field("target", &self.target())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
