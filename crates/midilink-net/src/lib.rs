//! Network MIDI peer sessions and the router-side client adapter.
//!
//! A [`PeerSession`] embodies one live network MIDI connection: the wire
//! protocol stack drives it with received packets and status transitions,
//! and drains its outbound queue. A [`NetworkMidiClient`] bridges one
//! session to the routing hub, translating session signals into
//! [`midilink_core::MidiRouter`] calls and forwarding router traffic back
//! down to the wire.

pub mod error;
pub use error::{Error, Result};

mod session;
pub use session::{PeerSession, PeerStatus, SessionStats, SocketTarget};

mod client;
pub use client::{NetworkMidiClient, PeerDetails, StatusDescriptor};
