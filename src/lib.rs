//! # Midilink - Network MIDI bridging
//!
//! Adapters that bind network MIDI peer sessions to a central router.
//!
//! ## Architecture
//!
//! Midilink is an umbrella crate over two subsystems:
//! - **midilink-core** - routing vocabulary: peer ids, MIDI data views,
//!   lifecycle events, the `MidiPeer`/`MidiRouter` contracts, and the signal
//!   primitive sessions publish with
//! - **midilink-net** - network peer sessions and the client adapter that
//!   bridges one session to the router
//!
//! ## Quick Start
//!
//! ```ignore
//! use midilink::prelude::*;
//! use std::sync::Arc;
//!
//! // The router hands out the peer id and receives everything the peer does.
//! let client = NetworkMidiClient::connect_to(
//!     router,                 // Arc<dyn MidiRouter>
//!     PeerId(1),
//!     "studio-link",          // name announced on the wire
//!     "studio.local",
//!     5004,
//! );
//!
//! // The wire protocol stack drives the session; the router observes.
//! client.session().set_status(PeerStatus::Connected);
//! client.session().receive_midi(&[0x90, 0x3C, 0x7F]);
//! ```

/// Re-export of midilink-core for direct access
pub use midilink_core as core;
/// Re-export of midilink-net for direct access
pub use midilink_net as net;

pub use midilink_core::{MidiData, MidiPeer, MidiRouter, PeerEvent, PeerId, Signal, Subscription};

pub use midilink_net::{
    Error, NetworkMidiClient, PeerDetails, PeerSession, PeerStatus, SessionStats, SocketTarget,
    StatusDescriptor,
};

pub mod prelude {
    //! Common imports for working with midilink.

    pub use crate::{
        MidiData, MidiPeer, MidiRouter, NetworkMidiClient, PeerEvent, PeerId, PeerSession,
        PeerStatus, StatusDescriptor,
    };
}
