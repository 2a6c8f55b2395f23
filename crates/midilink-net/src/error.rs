//! Error types for the network MIDI subsystem.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The bounded outbound queue is full; the packet was not enqueued.
    #[error("outbound queue full, dropped {0} byte packet")]
    OutboundQueueFull(usize),

    /// The wire side dropped its end of the outbound queue.
    #[error("peer session closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
