//! Event Bus
//!
//! Publish/subscribe registry for resource mutation events, independent of
//! the cache itself.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error};

use super::EventKind;

// == Cache Event ==
/// An event as delivered to listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEvent {
    /// The kind that was published
    pub kind: EventKind,
    /// Optional payload supplied by the publisher
    pub data: Option<Value>,
}

/// Callback invoked for each matching event.
///
/// Identity is the `Arc` allocation: registering the same handle twice for
/// one kind keeps a single registration.
pub type Listener = Arc<dyn Fn(&CacheEvent) -> anyhow::Result<()> + Send + Sync>;

/// Wraps a closure into a [`Listener`] handle.
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&CacheEvent) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

type Registry = HashMap<EventKind, Vec<Listener>>;

// == Event Bus ==
/// Listener registry keyed by event kind. Cloning shares the registry.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("kinds", &self.listeners.lock().len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    // == Subscribe ==
    /// Registers a listener for one kind.
    ///
    /// The returned [`Subscription`] removes exactly this listener when
    /// [`Subscription::unsubscribe`] is called. Dropping it keeps the
    /// listener registered.
    pub fn subscribe(&self, kind: EventKind, listener: Listener) -> Subscription {
        {
            let mut registry = self.listeners.lock();
            let set = registry.entry(kind).or_default();
            if !set.iter().any(|existing| Arc::ptr_eq(existing, &listener)) {
                set.push(Arc::clone(&listener));
            }
        }

        Subscription {
            kind,
            listener,
            registry: Arc::clone(&self.listeners),
        }
    }

    // == Publish ==
    /// Delivers an event to every listener of `kind`, then to every
    /// `CacheInvalidated` listener unless `kind` is itself `CacheInvalidated`.
    ///
    /// A listener that fails or panics is logged and skipped. Listeners run
    /// outside the registry lock, so they may subscribe or unsubscribe.
    pub fn publish(&self, kind: EventKind, data: Option<Value>) {
        debug!(event = %kind, "publishing cache event");
        let event = CacheEvent { kind, data };

        let (specific, generic) = {
            let registry = self.listeners.lock();
            let specific = registry.get(&kind).cloned().unwrap_or_default();
            let generic = if kind == EventKind::CacheInvalidated {
                Vec::new()
            } else {
                registry
                    .get(&EventKind::CacheInvalidated)
                    .cloned()
                    .unwrap_or_default()
            };
            (specific, generic)
        };

        for listener in specific.iter().chain(generic.iter()) {
            deliver(listener, &event);
        }
    }

    /// Number of listeners registered for a kind.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.lock().get(&kind).map_or(0, Vec::len)
    }

    /// Returns true if any listener is registered for the kind.
    pub fn has_listeners(&self, kind: EventKind) -> bool {
        self.listeners.lock().contains_key(&kind)
    }
}

fn deliver(listener: &Listener, event: &CacheEvent) {
    match catch_unwind(AssertUnwindSafe(|| listener(event))) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => error!(event = %event.kind, error = %err, "cache event listener failed"),
        Err(_) => error!(event = %event.kind, "cache event listener panicked"),
    }
}

// == Subscription ==
/// Handle returned by [`EventBus::subscribe`].
pub struct Subscription {
    kind: EventKind,
    listener: Listener,
    registry: Arc<Mutex<Registry>>,
}

impl Subscription {
    /// The kind this subscription listens to.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Removes the listener, dropping the kind's entry once it is empty.
    pub fn unsubscribe(self) {
        let mut registry = self.registry.lock();
        if let Some(set) = registry.get_mut(&self.kind) {
            set.retain(|existing| !Arc::ptr_eq(existing, &self.listener));
            if set.is_empty() {
                registry.remove(&self.kind);
            }
        }
    }
}
