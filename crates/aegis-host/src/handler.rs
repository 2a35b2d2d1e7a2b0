//! Action handler registry
//!
//! Named handlers service bridge requests. Each handler receives the
//! request payload and a progress sink; whether a call streams is purely
//! up to the handler, the wire shape of the request does not change.

use futures_util::future::BoxFuture;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::HostError;
use crate::progress::ProgressSink;

/// Boxed async action handler.
pub type Handler = Arc<
    dyn Fn(serde_json::Value, ProgressSink) -> BoxFuture<'static, Result<serde_json::Value, HostError>>
        + Send
        + Sync,
>;

/// Named action handlers, looked up per request.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: Arc<RwLock<HashMap<String, Handler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `action`, replacing any existing one.
    pub fn register<F>(&self, action: impl Into<String>, handler: F)
    where
        F: Fn(serde_json::Value, ProgressSink) -> BoxFuture<'static, Result<serde_json::Value, HostError>>
            + Send
            + Sync
            + 'static,
    {
        let action = action.into();
        tracing::debug!(action = %action, "registered action handler");
        self.handlers.write().insert(action, Arc::new(handler));
    }

    pub fn get(&self, action: &str) -> Option<Handler> {
        self.handlers.read().get(action).cloned()
    }

    /// Registered action names, sorted.
    pub fn actions(&self) -> Vec<String> {
        let mut actions: Vec<String> = self.handlers.read().keys().cloned().collect();
        actions.sort();
        actions
    }
}
