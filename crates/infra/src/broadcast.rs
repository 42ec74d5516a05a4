//! Change-event fan-out.
//!
//! A subscriber is an unbounded channel; dropping the receiver is the only
//! unsubscribe. Delivery is best-effort, at-most-once per connected
//! subscriber, with no backlog for late joiners. The subscriber list lock
//! doubles as the single logical broadcast sequence: events are delivered
//! in commit order, never interleaved.

use std::sync::Mutex;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use vitrine_catalog::ChangeEvent;

#[derive(Debug, Default)]
pub struct EventBroadcaster {
    subscribers: Mutex<Vec<UnboundedSender<ChangeEvent>>>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a long-lived subscriber channel.
    pub fn subscribe(&self) -> UnboundedReceiver<ChangeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    /// Deliver `event` to every live subscriber. A channel whose receiver
    /// is gone fails its send and is pruned; the rest still get the event.
    /// Never blocks and never surfaces an error to the mutating caller.
    pub fn broadcast(&self, event: &ChangeEvent) {
        let Ok(mut subs) = self.subscribers.lock() else {
            tracing::warn!(kind = event.kind.as_str(), "subscriber list poisoned; event dropped");
            return;
        };
        subs.retain(|tx| tx.send(event.clone()).is_ok());
        tracing::debug!(
            kind = event.kind.as_str(),
            slug = %event.slug,
            subscribers = subs.len(),
            "change event broadcast"
        );
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}
