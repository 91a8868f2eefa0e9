//! Invalidation Bus Module
//!
//! In-process publish/subscribe for invalidation events. Delivery is
//! synchronous, best-effort and not persisted: a handler that is not
//! subscribed at publish time never sees the event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use super::InvalidationEvent;

/// Handle returned by [`InvalidationBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&InvalidationEvent) + Send + Sync>;

// == Invalidation Bus ==
#[derive(Default)]
pub struct InvalidationBus {
    /// Handlers in subscription order
    handlers: RwLock<Vec<(SubscriptionId, Handler)>>,
    next_id: AtomicU64,
}

impl InvalidationBus {
    pub fn new() -> Self {
        Self::default()
    }

    // == Subscribe ==
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&InvalidationEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, Arc::new(handler)));
        id
    }

    // == Unsubscribe ==
    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(sub, _)| *sub != id);
        handlers.len() != before
    }

    // == Publish ==
    /// Calls every current handler in subscription order and returns how
    /// many were notified.
    ///
    /// The handler list is snapshotted first, so handlers may subscribe or
    /// unsubscribe while being called.
    pub fn publish(&self, event: &InvalidationEvent) -> usize {
        let snapshot: Vec<Handler> = self
            .handlers
            .read()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        trace!(invalidation = ?event.target, subscribers = snapshot.len(), "publishing invalidation");
        for handler in &snapshot {
            handler(event);
        }
        snapshot.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl std::fmt::Debug for InvalidationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvalidationBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
