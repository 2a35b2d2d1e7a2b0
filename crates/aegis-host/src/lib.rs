//! Aegis Host
//!
//! The in-process privileged counterpart of the bridge: a registry of
//! named action handlers and a [`Channel`](aegis_bridge::Channel)
//! implementation that dispatches requests to them on the tokio runtime,
//! feeding terminal and progress deliveries back to the bridge
//! out-of-band.
//!
//! The concrete privileged operations (filesystem, dialogs, window
//! chrome) are supplied by the embedding shell through
//! [`HandlerRegistry::register`]; this crate only provides the plumbing.

mod channel;
mod error;
mod handler;
mod progress;

pub use channel::{connect, pump_deliveries, LocalChannel};
pub use error::HostError;
pub use handler::{Handler, HandlerRegistry};
pub use progress::ProgressSink;

pub type Result<T> = std::result::Result<T, HostError>;
