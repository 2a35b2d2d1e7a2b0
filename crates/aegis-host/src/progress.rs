//! Per-call progress sink

use tokio::sync::mpsc;

use aegis_bridge::{CallId, Delivery, ProgressDelivery};

/// Emits progress deliveries for one in-flight call. Handed to every
/// handler; one-shot handlers simply never call it.
#[derive(Clone)]
pub struct ProgressSink {
    callback_id: CallId,
    deliveries: mpsc::UnboundedSender<Delivery>,
}

impl ProgressSink {
    pub(crate) fn new(callback_id: CallId, deliveries: mpsc::UnboundedSender<Delivery>) -> Self {
        Self {
            callback_id,
            deliveries,
        }
    }

    /// Send one progress notification for this call. Dropped silently if
    /// the delivery stream is gone.
    pub fn emit(&self, data: serde_json::Value) {
        let _ = self.deliveries.send(Delivery::Progress(ProgressDelivery {
            callback_id: self.callback_id,
            data,
        }));
    }
}
