use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

use crate::{
    AnyCallback, Callback, ListenerReference, ReferenceResolver, ResolveError,
};

/// The methods a named listener exposes, by name.
///
/// # Example
/// ```
/// use rs_event_bus::{any_callback, callback, ListenerBinding};
///
/// let binding = ListenerBinding::new()
///     .method("handle", callback(|_| async { Ok(()) }))
///     .any_method("audit", any_callback(|_, _| async { Ok(()) }));
/// assert!(binding.has_method("handle"));
/// assert!(!binding.has_method("audit"));
/// ```
#[derive(Clone, Default)]
pub struct ListenerBinding {
    methods: HashMap<String, Callback>,
    any_methods: HashMap<String, AnyCallback>,
}

impl ListenerBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a method usable as a per-event listener.
    pub fn method(mut self, name: impl Into<String>, callback: Callback) -> Self {
        self.methods.insert(name.into(), callback);
        self
    }

    /// Adds a method usable as a catch-all listener.
    pub fn any_method(mut self, name: impl Into<String>, callback: AnyCallback) -> Self {
        self.any_methods.insert(name.into(), callback);
        self
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn has_any_method(&self, name: &str) -> bool {
        self.any_methods.contains_key(name)
    }
}

/// Default [`ReferenceResolver`]: named listeners are bound explicitly under a path.
///
/// Every resolution returns a fresh callable wrapping the bound method, so each
/// registration has its own identity. Clones share the same bindings.
#[derive(Clone, Default)]
pub struct ListenerContainer {
    bindings: Arc<DashMap<String, ListenerBinding>>,
}

impl ListenerContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a listener at `path`, replacing any previous binding.
    pub fn bind(&self, path: impl Into<String>, binding: ListenerBinding) -> &Self {
        self.bindings.insert(path.into(), binding);
        self
    }

    pub fn unbind(&self, path: &str) -> Option<ListenerBinding> {
        self.bindings.remove(path).map(|(_, binding)| binding)
    }

    pub fn is_bound(&self, path: &str) -> bool {
        self.bindings.contains_key(path)
    }

    fn lookup<C: Clone>(
        &self,
        reference: &ListenerReference,
        methods: impl Fn(&ListenerBinding) -> &HashMap<String, C>,
    ) -> Result<C, ResolveError> {
        let binding = self
            .bindings
            .get(&reference.path)
            .ok_or_else(|| ResolveError::NotBound { path: reference.path.clone() })?;
        let method = methods(&*binding).get(&reference.method).cloned();
        method.ok_or_else(|| ResolveError::MethodNotFound {
            path: reference.path.clone(),
            method: reference.method.clone(),
        })
    }
}

impl ReferenceResolver for ListenerContainer {
    fn resolve_event_handler(
        &self,
        namespace: &str,
        event_name: &str,
        reference: &str,
    ) -> Result<Callback, ResolveError> {
        let parsed = ListenerReference::parse(namespace, reference)?;
        let bound = self.lookup(&parsed, |binding| &binding.methods)?;
        trace!(event = event_name, path = %parsed.path, method = %parsed.method, "resolved listener");
        Ok(Arc::new(move |payload| bound(payload)))
    }

    fn resolve_any_handler(
        &self,
        namespace: &str,
        reference: &str,
    ) -> Result<AnyCallback, ResolveError> {
        let parsed = ListenerReference::parse(namespace, reference)?;
        let bound = self.lookup(&parsed, |binding| &binding.any_methods)?;
        trace!(path = %parsed.path, method = %parsed.method, "resolved catch-all listener");
        Ok(Arc::new(move |event: &str, payload| bound(event, payload)))
    }
}
