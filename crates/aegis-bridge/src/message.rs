//! Bridge wire messages
//!
//! One outbound request shape and two inbound delivery shapes share the
//! same callback-id space. Field names on the wire match what the
//! front-end surface speaks (`action`, `payload`, `callbackId`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Process-wide monotonic call identifier correlating a request with its
/// eventual deliveries. Never reused within a process lifetime.
pub type CallId = u64;

/// Typed action identifier: the full dotted name plus its namespace,
/// computed once at construction so the capability gate does no string
/// parsing at call time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionId {
    name: String,
    namespace_len: usize,
}

impl ActionId {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let namespace_len = name.find('.').unwrap_or(name.len());
        Self {
            name,
            namespace_len,
        }
    }

    /// Full dotted name, e.g. `dialog.open`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Segment before the first `.`; a bare name is its own namespace.
    pub fn namespace(&self) -> &str {
        &self.name[..self.namespace_len]
    }
}

impl From<&str> for ActionId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ActionId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Serialize for ActionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl<'de> Deserialize<'de> for ActionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::new(String::deserialize(deserializer)?))
    }
}

/// The only value handed to the channel's outbound send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub action: ActionId,
    pub payload: serde_json::Value,
    pub callback_id: CallId,
}

/// The single success/failure result that ends a call's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalDelivery {
    pub callback_id: CallId,
    pub success: bool,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TerminalDelivery {
    pub fn success(callback_id: CallId, data: serde_json::Value) -> Self {
        Self {
            callback_id,
            success: true,
            data,
            error: None,
        }
    }

    pub fn failure(callback_id: CallId, reason: impl Into<String>) -> Self {
        Self {
            callback_id,
            success: false,
            data: serde_json::Value::Null,
            error: Some(reason.into()),
        }
    }

    /// Map the wire shape to an outcome; a failure reason is propagated
    /// verbatim.
    pub fn into_outcome(self) -> crate::Outcome {
        if self.success {
            Ok(self.data)
        } else {
            Err(crate::BridgeError::Counterpart(
                self.error.unwrap_or_default(),
            ))
        }
    }
}

/// A non-terminal, repeatable notification for an in-flight call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDelivery {
    pub callback_id: CallId,
    pub data: serde_json::Value,
}

/// Inbound delivery envelope for transports that multiplex both shapes
/// over one channel. The two shapes are distinguished by the envelope
/// tag, never by sniffing payload fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Delivery {
    Terminal(TerminalDelivery),
    Progress(ProgressDelivery),
}

impl Delivery {
    pub fn callback_id(&self) -> CallId {
        match self {
            Delivery::Terminal(t) => t.callback_id,
            Delivery::Progress(p) => p.callback_id,
        }
    }
}
