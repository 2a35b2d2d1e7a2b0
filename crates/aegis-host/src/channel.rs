//! In-process transport
//!
//! [`LocalChannel`] dispatches requests to the handler registry on the
//! tokio runtime. Deliveries flow back through an out-of-band stream the
//! shell pumps into [`Bridge::deliver`]; dropping the stream detaches the
//! transport and later sends report unavailable.

use std::sync::Arc;
use tokio::sync::mpsc;

use aegis_bridge::{
    Bridge, Channel, ChannelError, Delivery, Request, TerminalDelivery,
};

use crate::error::HostError;
use crate::handler::HandlerRegistry;
use crate::progress::ProgressSink;

pub struct LocalChannel {
    handlers: HandlerRegistry,
    deliveries: mpsc::UnboundedSender<Delivery>,
}

impl LocalChannel {
    /// Build the channel plus the stream its deliveries flow through.
    /// The caller pumps the stream into the bridge, usually via
    /// [`pump_deliveries`].
    pub fn new(handlers: HandlerRegistry) -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                handlers,
                deliveries: tx,
            },
            rx,
        )
    }
}

impl Channel for LocalChannel {
    fn send(&self, request: &Request) -> Result<(), ChannelError> {
        if self.deliveries.is_closed() {
            return Err(ChannelError::Unavailable);
        }

        let id = request.callback_id;
        let deliveries = self.deliveries.clone();

        match self.handlers.get(request.action.name()) {
            Some(handler) => {
                let sink = ProgressSink::new(id, deliveries.clone());
                let pending = handler(request.payload.clone(), sink);
                tokio::spawn(async move {
                    let terminal = match pending.await {
                        Ok(data) => TerminalDelivery::success(id, data),
                        Err(err) => TerminalDelivery::failure(id, err.to_string()),
                    };
                    let _ = deliveries.send(Delivery::Terminal(terminal));
                });
            }
            None => {
                tracing::warn!(callback_id = id, action = %request.action, "no handler for action");
                let reason = HostError::UnknownAction(request.action.name().to_string());
                let _ = deliveries.send(Delivery::Terminal(TerminalDelivery::failure(
                    id,
                    reason.to_string(),
                )));
            }
        }

        Ok(())
    }
}

/// Spawn a task that pumps deliveries into the bridge until the channel
/// side is dropped.
pub fn pump_deliveries(
    bridge: Arc<Bridge>,
    mut deliveries: mpsc::UnboundedReceiver<Delivery>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(delivery) = deliveries.recv().await {
            bridge.deliver(delivery);
        }
    })
}

/// Wire a bridge to an in-process host in one step: channel, bridge, and
/// delivery pump.
pub fn connect(handlers: HandlerRegistry, allow: aegis_bridge::AllowList) -> Arc<Bridge> {
    let (channel, deliveries) = LocalChannel::new(handlers);
    let bridge = Arc::new(Bridge::with_allow_list(Arc::new(channel), allow));
    pump_deliveries(Arc::clone(&bridge), deliveries);
    bridge
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_bridge::{AllowList, BridgeError};
    use futures_util::FutureExt;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::time::Duration;

    fn echo_registry() -> HandlerRegistry {
        let registry = HandlerRegistry::new();
        registry.register("echo", |payload, _progress| {
            async move { Ok(payload) }.boxed()
        });
        registry
    }

    #[tokio::test]
    async fn test_round_trip() {
        let bridge = connect(echo_registry(), AllowList::permissive());

        let outcome = bridge.invoke("echo", json!({"msg": "hello"})).await;
        assert_eq!(outcome.unwrap(), json!({"msg": "hello"}));
        assert_eq!(bridge.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_handler_failure_reason_verbatim() {
        let registry = HandlerRegistry::new();
        registry.register("fail", |_, _| {
            async { Err(HostError::Handler("disk on fire".into())) }.boxed()
        });
        let bridge = connect(registry, AllowList::permissive());

        match bridge.invoke("fail", json!({})).await {
            Err(BridgeError::Counterpart(reason)) => assert_eq!(reason, "disk on fire"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_action_fails_terminally() {
        let bridge = connect(echo_registry(), AllowList::permissive());

        match bridge.invoke("nope", json!({})).await {
            Err(BridgeError::Counterpart(reason)) => {
                assert_eq!(reason, "Unknown action: nope");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_gate_applies_before_dispatch() {
        let mut allow = AllowList::deny_all();
        allow.configure([aegis_bridge::AllowToken::parse("read")]);
        let bridge = connect(echo_registry(), allow);

        let outcome = bridge.invoke("echo", json!({})).await;
        assert!(matches!(outcome, Err(BridgeError::NotPermitted(_))));
    }

    #[tokio::test]
    async fn test_progress_emissions_arrive_before_terminal() {
        let registry = HandlerRegistry::new();
        registry.register("copy.async", |_, progress| {
            async move {
                for percent in [10, 50, 100] {
                    progress.emit(json!({"percent": percent}));
                }
                Ok(json!({"copied": true}))
            }
            .boxed()
        });
        let bridge = connect(registry, AllowList::permissive());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let outcome = bridge
            .invoke_with_progress("copy.async", json!({}), move |data| sink.lock().push(data))
            .await;

        assert_eq!(outcome.unwrap(), json!({"copied": true}));
        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], json!({"percent": 10}));
        assert_eq!(seen[2], json!({"percent": 100}));
    }

    #[tokio::test]
    async fn test_detached_stream_reports_unavailable() {
        let (channel, deliveries) = LocalChannel::new(echo_registry());
        drop(deliveries);
        let bridge = Bridge::new(Arc::new(channel));

        let outcome = bridge.invoke("echo", json!({})).await;
        assert_eq!(outcome.unwrap_err(), BridgeError::Unavailable);
        assert_eq!(bridge.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_calls_complete_independently() {
        let registry = HandlerRegistry::new();
        registry.register("slow", |payload, _| {
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(payload)
            }
            .boxed()
        });
        registry.register("fast", |payload, _| async move { Ok(payload) }.boxed());
        let bridge = connect(registry, AllowList::permissive());

        let slow = bridge.invoke("slow", json!("s"));
        let fast = bridge.invoke("fast", json!("f"));

        let (slow, fast) = tokio::join!(slow, fast);
        assert_eq!(slow.unwrap(), json!("s"));
        assert_eq!(fast.unwrap(), json!("f"));
    }
}
