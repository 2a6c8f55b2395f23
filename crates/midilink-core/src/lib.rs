//! Core types and traits for MIDI peer routing.
//!
//! The routing hub and its peers speak this vocabulary: peers are addressed
//! by [`PeerId`], MIDI messages travel as [`MidiData`] views, and lifecycle
//! edges arrive as [`PeerEvent`]s. Network adapters implement [`MidiPeer`];
//! the dispatch hub implements [`MidiRouter`]. [`Signal`] is the
//! emit/subscribe primitive sessions use to publish wire events.

pub mod data;
pub use data::MidiData;

pub mod peer;
pub use peer::{MidiPeer, MidiRouter, PeerEvent, PeerId};

pub mod signal;
pub use signal::{Signal, Subscription};
