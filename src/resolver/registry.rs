use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use crate::{
    AnyCallback, Callback, ListenerKey, ReferenceResolver, ResolveError, DEFAULT_NAMESPACE,
};

/// Remembers which callable each named listener resolved to.
///
/// The emitter only ever sees concrete callables. This side table maps the
/// `(event, reference)` pair, or the bare reference for catch-all listeners, back to the
/// callable that was registered, so removing by reference finds the right listener.
///
/// The registry never holds a listener of its own: whether a listener is active is decided
/// by the emitter alone.
pub struct ResolutionRegistry {
    resolver: Arc<dyn ReferenceResolver>,
    namespace: RwLock<String>,
    event_handlers: DashMap<(String, String), Callback>,
    any_handlers: DashMap<String, AnyCallback>,
}

impl ResolutionRegistry {
    /// Creates a registry resolving through `resolver`, starting at `namespace`.
    pub fn new(resolver: Arc<dyn ReferenceResolver>, namespace: impl Into<String>) -> Self {
        Self {
            resolver,
            namespace: RwLock::new(namespace.into()),
            event_handlers: DashMap::new(),
            any_handlers: DashMap::new(),
        }
    }

    /// Resolves `reference` for `event_name` and records the result.
    ///
    /// Each call resolves again; a previous entry for the same pair is replaced. Resolution
    /// errors are returned untouched and leave the table unchanged.
    pub fn resolve_event_handler(
        &self,
        event_name: &str,
        reference: &str,
    ) -> Result<Callback, ResolveError> {
        // Resolvers may call back into the registry, so no guard is held across resolution.
        let namespace = self.namespace();
        let handler = self.resolver.resolve_event_handler(&namespace, event_name, reference)?;
        let replaced = self
            .event_handlers
            .insert((event_name.to_string(), reference.to_string()), Arc::clone(&handler));
        debug!(
            event = event_name,
            reference,
            replaced = replaced.is_some(),
            "resolved named listener"
        );
        Ok(handler)
    }

    /// Removes and returns the callable recorded for `(event_name, reference)`.
    ///
    /// `None` means nothing was registered under that pair, which callers treat as a no-op.
    pub fn remove_event_handler(&self, event_name: &str, reference: &str) -> Option<Callback> {
        let key = (event_name.to_string(), reference.to_string());
        self.event_handlers.remove(&key).map(|(_, handler)| handler)
    }

    /// Removes the entry for `(event_name, reference)` only while it still records the callable
    /// identified by `key`.
    pub fn forget_event_handler(&self, event_name: &str, reference: &str, key: ListenerKey) -> bool {
        let entry = (event_name.to_string(), reference.to_string());
        self.event_handlers
            .remove_if(&entry, |_, handler| ListenerKey::of(handler) == key)
            .is_some()
    }

    /// Resolves `reference` as a catch-all listener and records the result.
    pub fn resolve_any_handler(&self, reference: &str) -> Result<AnyCallback, ResolveError> {
        let namespace = self.namespace();
        let handler = self.resolver.resolve_any_handler(&namespace, reference)?;
        let replaced = self.any_handlers.insert(reference.to_string(), Arc::clone(&handler));
        debug!(reference, replaced = replaced.is_some(), "resolved named catch-all listener");
        Ok(handler)
    }

    /// Removes and returns the callable recorded for the catch-all `reference`.
    pub fn remove_any_handler(&self, reference: &str) -> Option<AnyCallback> {
        self.any_handlers.remove(reference).map(|(_, handler)| handler)
    }

    /// Replaces the namespace used by later resolutions. Recorded entries keep their callables.
    pub fn set_namespace(&self, namespace: impl Into<String>) {
        let namespace = namespace.into();
        debug!(namespace = %namespace, "listener namespace changed");
        *self.namespace.write() = namespace;
    }

    /// Returns a copy of the namespace later resolutions use.
    pub fn namespace(&self) -> String {
        self.namespace.read().clone()
    }

    /// The callable currently recorded for `(event_name, reference)`.
    pub fn event_handler(&self, event_name: &str, reference: &str) -> Option<Callback> {
        let key = (event_name.to_string(), reference.to_string());
        self.event_handlers.get(&key).map(|handler| handler.value().clone())
    }

    /// The callable currently recorded for the catch-all `reference`.
    pub fn any_handler(&self, reference: &str) -> Option<AnyCallback> {
        self.any_handlers.get(reference).map(|handler| handler.value().clone())
    }

    /// Number of recorded entries, per-event and catch-all together.
    pub fn len(&self) -> usize {
        self.event_handlers.len() + self.any_handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResolutionRegistry {
    /// A registry over an empty [`ListenerContainer`](crate::ListenerContainer) at the default namespace.
    fn default() -> Self {
        Self::new(Arc::new(crate::ListenerContainer::new()), DEFAULT_NAMESPACE)
    }
}
