//! Bridge error taxonomy
//!
//! Every failure a caller can observe travels through a call's terminal
//! outcome so there is one uniform failure channel, whether the rejection
//! happened locally (gate, transport) or in the counterpart.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Rejected by the allow-list before any id was allocated or the
    /// channel was touched.
    #[error("action not permitted: {0}")]
    NotPermitted(String),

    /// Outbound send attempted while the transport was not attached.
    #[error("bridge not available")]
    Unavailable,

    /// Terminal delivery with `success: false`; the counterpart-supplied
    /// reason is propagated verbatim.
    #[error("{0}")]
    Counterpart(String),

    /// Call settled locally through [`crate::Bridge::cancel`].
    #[error("call cancelled")]
    Cancelled,

    /// Bridge disposed while the call was still pending.
    #[error("bridge disposed")]
    Disposed,
}
