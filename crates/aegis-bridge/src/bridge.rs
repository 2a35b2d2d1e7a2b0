//! Bridge invoker
//!
//! The single public entry point callers use: gate check, id allocation,
//! registration, outbound send, and the inbound delivery entry points the
//! counterpart transport drives. One owned `Bridge` instance is created at
//! shell initialization and injected wherever calls are made.

use parking_lot::RwLock;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use crate::allowlist::AllowList;
use crate::channel::Channel;
use crate::error::BridgeError;
use crate::message::{ActionId, CallId, Delivery, ProgressDelivery, Request, TerminalDelivery};
use crate::registry::{CallRegistry, ProgressFn};
use crate::Outcome;

pub struct Bridge {
    /// Capability gate, read by every invoke
    allow: RwLock<AllowList>,
    /// In-flight calls
    registry: CallRegistry,
    /// Outbound transport
    channel: Arc<dyn Channel>,
    /// Monotonic callback-id counter; ids are never reused
    next_id: AtomicU64,
}

impl Bridge {
    /// Bridge with the default fail-open gate; see [`AllowList`].
    pub fn new(channel: Arc<dyn Channel>) -> Self {
        Self::with_allow_list(channel, AllowList::default())
    }

    pub fn with_allow_list(channel: Arc<dyn Channel>, allow: AllowList) -> Self {
        Self {
            allow: RwLock::new(allow),
            registry: CallRegistry::new(),
            channel,
            next_id: AtomicU64::new(1),
        }
    }

    /// Replace the capability gate wholesale. Intended for trusted
    /// startup code, before the first invoke.
    pub fn configure_allow_list(&self, allow: AllowList) {
        *self.allow.write() = allow;
    }

    /// Number of in-flight calls.
    pub fn in_flight(&self) -> usize {
        self.registry.len()
    }

    /// Invoke a one-shot action. Returns synchronously with a
    /// not-yet-settled outcome.
    pub fn invoke(
        &self,
        action: impl Into<ActionId>,
        payload: serde_json::Value,
    ) -> PendingOutcome {
        self.invoke_inner(action.into(), payload, None)
    }

    /// Invoke a streaming action: `on_progress` is called zero or more
    /// times, strictly before the terminal outcome settles.
    pub fn invoke_with_progress<F>(
        &self,
        action: impl Into<ActionId>,
        payload: serde_json::Value,
        on_progress: F,
    ) -> PendingOutcome
    where
        F: Fn(serde_json::Value) + Send + Sync + 'static,
    {
        self.invoke_inner(action.into(), payload, Some(Arc::new(on_progress)))
    }

    fn invoke_inner(
        &self,
        action: ActionId,
        payload: serde_json::Value,
        on_progress: Option<Arc<ProgressFn>>,
    ) -> PendingOutcome {
        // Gate check comes strictly before id allocation: a disallowed
        // action never consumes an id and never reaches the channel.
        if !self.allow.read().is_permitted(&action) {
            tracing::warn!(action = %action, "invoke rejected by allow-list");
            return PendingOutcome::ready(Err(BridgeError::NotPermitted(
                action.name().to_string(),
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (settle, outcome) = oneshot::channel();
        self.registry.register(id, settle, on_progress);

        let request = Request {
            action,
            payload,
            callback_id: id,
        };
        tracing::debug!(callback_id = id, action = %request.action, "dispatching request");

        if let Err(err) = self.channel.send(&request) {
            tracing::warn!(callback_id = id, error = %err, "outbound send failed");
            // Settles the future and de-registers the id in one step,
            // leaving no orphaned registry entry.
            self.registry.resolve_terminal(id, Err(BridgeError::Unavailable));
        }

        PendingOutcome::waiting(id, outcome)
    }

    /// Inbound entry point: the single terminal result for a call.
    /// Unknown or stale ids are dropped silently.
    pub fn deliver_terminal(&self, delivery: TerminalDelivery) {
        let id = delivery.callback_id;
        self.registry.resolve_terminal(id, delivery.into_outcome());
    }

    /// Inbound entry point: a non-terminal progress notification.
    /// Unknown ids, or calls without a subscriber, are dropped silently.
    pub fn deliver_progress(&self, delivery: ProgressDelivery) {
        self.registry.dispatch_progress(delivery.callback_id, delivery.data);
    }

    /// Route a multiplexed delivery envelope to the matching entry point.
    pub fn deliver(&self, delivery: Delivery) {
        match delivery {
            Delivery::Terminal(terminal) => self.deliver_terminal(terminal),
            Delivery::Progress(progress) => self.deliver_progress(progress),
        }
    }

    /// Settle a pending call locally with [`BridgeError::Cancelled`].
    /// The counterpart is not informed; its eventual terminal delivery
    /// becomes a stale no-op.
    pub fn cancel(&self, id: CallId) {
        self.registry.resolve_terminal(id, Err(BridgeError::Cancelled));
    }

    /// Reject every pending call with [`BridgeError::Disposed`]. Called
    /// when the shell tears the bridge down.
    pub fn dispose(&self) {
        self.registry.reject_all(BridgeError::Disposed);
    }
}

/// A call's not-yet-settled outcome. Resolves exactly once; an abandoned
/// registry settles it as disposed rather than hanging forever.
pub struct PendingOutcome {
    call_id: Option<CallId>,
    state: State,
}

enum State {
    Ready(Option<Outcome>),
    Waiting(oneshot::Receiver<Outcome>),
}

impl PendingOutcome {
    fn ready(outcome: Outcome) -> Self {
        Self {
            call_id: None,
            state: State::Ready(Some(outcome)),
        }
    }

    fn waiting(call_id: CallId, receiver: oneshot::Receiver<Outcome>) -> Self {
        Self {
            call_id: Some(call_id),
            state: State::Waiting(receiver),
        }
    }

    /// Callback id of the in-flight call, usable with
    /// [`Bridge::cancel`]. `None` when the call was rejected by the gate
    /// and never allocated an id.
    pub fn call_id(&self) -> Option<CallId> {
        self.call_id
    }
}

impl Future for PendingOutcome {
    type Output = Outcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.state {
            State::Ready(outcome) => {
                Poll::Ready(outcome.take().unwrap_or(Err(BridgeError::Disposed)))
            }
            State::Waiting(receiver) => Pin::new(receiver).poll(cx).map(|settled| {
                match settled {
                    Ok(outcome) => outcome,
                    // Registry dropped without settling the call
                    Err(_) => Err(BridgeError::Disposed),
                }
            }),
        }
    }
}
