//! In-flight call registry
//!
//! Maps callback ids to their pending settlement and optional progress
//! subscriber. Exactly one terminal settlement is ever applied per call;
//! deliveries for ids no longer present are dropped silently, which is
//! what protects the bridge against duplicate, late, or invented
//! deliveries from the counterpart.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::error::BridgeError;
use crate::message::CallId;
use crate::Outcome;

/// Progress subscriber invoked for each progress delivery of one call.
pub type ProgressFn = dyn Fn(serde_json::Value) + Send + Sync;

struct PendingCall {
    settle: oneshot::Sender<Outcome>,
    on_progress: Option<Arc<ProgressFn>>,
}

/// Registry of in-flight calls keyed by callback id.
#[derive(Default)]
pub struct CallRegistry {
    calls: Mutex<HashMap<CallId, PendingCall>>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of in-flight calls.
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    pub fn contains(&self, id: CallId) -> bool {
        self.calls.lock().contains_key(&id)
    }

    /// Store a pending call and optional progress subscriber under `id`.
    ///
    /// Ids come from a single monotonic counter and must never collide;
    /// a duplicate registration is a programming error and panics.
    pub fn register(
        &self,
        id: CallId,
        settle: oneshot::Sender<Outcome>,
        on_progress: Option<Arc<ProgressFn>>,
    ) {
        let mut calls = self.calls.lock();
        if calls
            .insert(
                id,
                PendingCall {
                    settle,
                    on_progress,
                },
            )
            .is_some()
        {
            panic!("callback id {id} registered twice");
        }
    }

    /// Remove the call for `id` together with its progress subscriber and
    /// apply `outcome` exactly once. Absent ids are a no-op: duplicate or
    /// late terminal deliveries, and deliveries for ids the counterpart
    /// invented, are dropped here.
    pub fn resolve_terminal(&self, id: CallId, outcome: Outcome) {
        let pending = self.calls.lock().remove(&id);
        match pending {
            Some(call) => {
                // The caller may have dropped the future already; that
                // only means nobody is listening.
                let _ = call.settle.send(outcome);
            }
            None => {
                tracing::debug!(callback_id = id, "dropping stale terminal delivery");
            }
        }
    }

    /// Invoke the progress subscriber for `id` with `data`. No subscriber,
    /// or a call already resolved and removed, is a no-op. Never settles
    /// the call.
    pub fn dispatch_progress(&self, id: CallId, data: serde_json::Value) {
        // Clone the subscriber out of the lock: it is caller code and may
        // re-enter the bridge.
        let subscriber = self
            .calls
            .lock()
            .get(&id)
            .and_then(|call| call.on_progress.clone());

        match subscriber {
            Some(on_progress) => on_progress(data),
            None => {
                tracing::debug!(callback_id = id, "dropping progress delivery without subscriber");
            }
        }
    }

    /// Settle every in-flight call with `reason` and empty the registry.
    pub fn reject_all(&self, reason: BridgeError) {
        let drained: Vec<(CallId, PendingCall)> = self.calls.lock().drain().collect();
        for (id, call) in drained {
            tracing::debug!(callback_id = id, reason = %reason, "rejecting pending call");
            let _ = call.settle.send(Err(reason.clone()));
        }
    }
}
