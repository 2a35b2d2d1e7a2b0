//! Outbound transport abstraction
//!
//! The bridge hands each serialized request to one [`Channel`]. Responses
//! never come back as a return value of `send`; the counterpart drives the
//! bridge's inbound delivery entry points instead.

use thiserror::Error;

use crate::message::Request;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The transport is not currently attached. Surfaced synchronously;
    /// no retry is attempted.
    #[error("channel unavailable")]
    Unavailable,
}

/// One-way outbound send primitive.
///
/// Implementations route inbound deliveries through
/// [`Bridge::deliver_terminal`](crate::Bridge::deliver_terminal) and
/// [`Bridge::deliver_progress`](crate::Bridge::deliver_progress); the
/// channel itself knows nothing about call semantics.
pub trait Channel: Send + Sync {
    /// Attempt outbound delivery, failing synchronously if the transport
    /// is unavailable.
    fn send(&self, request: &Request) -> Result<(), ChannelError>;
}
