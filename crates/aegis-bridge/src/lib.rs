//! Aegis Bridge
//!
//! Call-correlation and capability-gating core for the Aegis shell.
//! Front-end code invokes privileged actions by name through one [`Bridge`];
//! the privileged counterpart answers out-of-band through the inbound
//! delivery entry points, either with a single terminal result or with a
//! stream of progress notifications followed by one.

mod allowlist;
mod bridge;
mod channel;
mod error;
mod message;
mod registry;

pub use allowlist::{AllowList, AllowToken};
pub use bridge::{Bridge, PendingOutcome};
pub use channel::{Channel, ChannelError};
pub use error::BridgeError;
pub use message::{
    ActionId, CallId, Delivery, ProgressDelivery, Request, TerminalDelivery,
};
pub use registry::{CallRegistry, ProgressFn};

/// Terminal result of one bridge call. Exactly one outcome reaches a call.
pub type Outcome = std::result::Result<serde_json::Value, BridgeError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
