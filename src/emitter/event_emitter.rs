use dashmap::DashMap;
use futures::future::{join_all, BoxFuture};
use parking_lot::RwLock;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tracing::{trace, warn};

use crate::{
    AnyListener, EmitterTransport, EventError, EventPayload, Listener, ListenerKey,
    DEFAULT_MAX_LISTENERS,
};

/// The default emission engine.
///
/// Per-event listeners live in a `DashMap` keyed by event name, catch-all listeners in a
/// separate list. Clones share the same storage.
///
/// # Implementation Notes
/// - Listeners of one emission are snapshotted before any of them runs, so listeners
///   registered or removed by a running listener only affect later emissions.
/// - No map guard is held while user callbacks are invoked or awaited.
/// - Listeners of one emission run concurrently on the emitting task, not in parallel.
#[derive(Clone)]
pub struct EventEmitter {
    /// Listener count per event above which a leak warning is logged. `0` disables it.
    /// Shared between clones like the listener storage.
    max_listeners: Arc<AtomicUsize>,
    /// The concurrent map of event names to their listeners.
    events: Arc<DashMap<String, Vec<Listener>>>,
    /// Listeners invoked for every event.
    any_listeners: Arc<RwLock<Vec<AnyListener>>>,
}

impl EventEmitter {
    /// Creates a new `EventEmitter` from a passed max listeners value.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_event_bus::EventEmitter;
    ///
    /// let emitter = EventEmitter::new(20);
    /// assert_eq!(emitter.max_listeners(), 20);
    /// ```
    pub fn new(max_listeners: usize) -> Self {
        Self {
            max_listeners: Arc::new(AtomicUsize::new(max_listeners)),
            events: Arc::new(DashMap::new()),
            any_listeners: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Sets the listener count above which a possible leak is reported.
    ///
    /// Applies to every clone of this emitter, including the one held by an
    /// [`EventBus`](crate::EventBus).
    ///
    /// # Parameters
    /// * `max` - The new threshold. `0` disables the warning.
    pub fn set_max_listeners(&self, max: usize) {
        self.max_listeners.store(max, Ordering::Relaxed);
    }

    /// Returns the listener count per event above which a possible leak is reported.
    pub fn max_listeners(&self) -> usize {
        self.max_listeners.load(Ordering::Relaxed)
    }

    fn add(&self, event_name: &str, listener: Listener) {
        let mut entry = self.events.entry(event_name.to_string()).or_default();
        entry.push(listener);
        let max = self.max_listeners();
        if max > 0 && entry.len() > max {
            warn!(
                event = event_name,
                count = entry.len(),
                max,
                "possible listener leak, max listeners exceeded"
            );
        }
    }
}

impl Default for EventEmitter {
    /// Creates a new `EventEmitter` with a default max listeners of 10.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_event_bus::EventEmitter;
    ///
    /// let emitter = EventEmitter::default();
    /// assert_eq!(emitter.max_listeners(), 10);
    /// ```
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LISTENERS)
    }
}

impl EmitterTransport for EventEmitter {
    fn on(&self, event_name: &str, listener: Listener) {
        self.add(event_name, listener);
    }

    fn once(&self, event_name: &str, listener: Listener) {
        self.add(event_name, listener.limited_to_once());
    }

    fn on_any(&self, listener: AnyListener) {
        self.any_listeners.write().push(listener);
    }

    fn off(&self, event_name: &str, key: ListenerKey) -> usize {
        let removed = match self.events.get_mut(event_name) {
            Some(mut entry) => {
                let original_len = entry.len();
                entry.retain(|listener| listener.key() != key);
                original_len - entry.len()
            }
            None => 0,
        };
        self.events.remove_if(event_name, |_, listeners| listeners.is_empty());
        removed
    }

    fn off_any(&self, key: ListenerKey) -> usize {
        let mut any = self.any_listeners.write();
        let original_len = any.len();
        any.retain(|listener| listener.key() != key);
        original_len - any.len()
    }

    /// Emits the specified event and waits for its listeners.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use rs_event_bus::{callback, EmitterTransport, EventEmitter, Listener, ListenerKey};
    ///
    /// let emitter = EventEmitter::default();
    /// let cb = callback(|payload| async move {
    ///     assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("hello"));
    ///     Ok(())
    /// });
    /// emitter.once("greet", Listener::new(ListenerKey::of(&cb), cb));
    ///
    /// futures::executor::block_on(emitter.emit("greet", Arc::new("hello".to_string()))).unwrap();
    /// assert_eq!(emitter.listener_count(Some("greet")), 0);
    /// ```
    fn emit(
        &self,
        event_name: &str,
        payload: EventPayload,
    ) -> BoxFuture<'static, Result<(), EventError>> {
        // Claim call budgets and drop exhausted listeners before anything runs.
        let claimed: Vec<Listener> = match self.events.get_mut(event_name) {
            Some(mut entry) => {
                let claimed: Vec<Listener> =
                    entry.iter().filter(|listener| listener.claim()).cloned().collect();
                entry.retain(|listener| !listener.at_limit());
                claimed
            }
            None => Vec::new(),
        };
        self.events.remove_if(event_name, |_, listeners| listeners.is_empty());
        let any: Vec<AnyListener> = {
            let mut any_listeners = self.any_listeners.write();
            let claimed: Vec<AnyListener> =
                any_listeners.iter().filter(|listener| listener.claim()).cloned().collect();
            any_listeners.retain(|listener| !listener.at_limit());
            claimed
        };

        let mut pending: Vec<_> = claimed
            .iter()
            .map(|listener| listener.invoke(Arc::clone(&payload)))
            .collect();
        pending.extend(
            any.iter()
                .map(|listener| listener.invoke(event_name, Arc::clone(&payload))),
        );
        trace!(event = event_name, listeners = pending.len(), "emitting event");

        let event = event_name.to_string();
        Box::pin(async move {
            let mut first_failure = None;
            for result in join_all(pending).await {
                if let Err(source) = result {
                    warn!(event = %event, error = %source, "listener failed");
                    first_failure.get_or_insert(source);
                }
            }
            match first_failure {
                Some(source) => Err(EventError::Listener { event, source }),
                None => Ok(()),
            }
        })
    }

    fn clear_listeners(&self, event_name: Option<&str>) {
        match event_name {
            Some(event_name) => {
                self.events.remove(event_name);
            }
            None => self.events.clear(),
        }
    }

    fn listener_count(&self, event_name: Option<&str>) -> usize {
        match event_name {
            Some(event_name) => self
                .events
                .get(event_name)
                .map(|entry| entry.len())
                .unwrap_or(0),
            None => {
                let per_event: usize = self.events.iter().map(|entry| entry.len()).sum();
                per_event + self.any_listeners.read().len()
            }
        }
    }

    fn event_names(&self) -> Vec<String> {
        self.events
            .iter()
            .filter(|entry| !entry.is_empty())
            .map(|entry| entry.key().clone())
            .collect()
    }
}
