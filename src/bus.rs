use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::debug;

use crate::{
    AnyHandler, AnyPayload, BusConfig, Callback, EmitterTransport, EventEmitter, EventKey,
    EventPayload, Handler, Listener, ListenerContainer, ListenerFuture, ListenerKey,
    ListenerResult, ReferenceResolver, ResolutionRegistry, Result, TypedEmitter,
};

/// The application facing event bus.
///
/// Listeners are given either as callables or as references such as `"SendWelcomeEmail"`
/// or `"User.onCreated"`. References are resolved through the [`ResolutionRegistry`] when
/// they are registered, and the registry remembers the result so the same reference can be
/// removed later. Storage and dispatch are left to the transport `E`.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use rs_event_bus::{callback, EventBus, ListenerBinding, ListenerContainer};
///
/// let sent = Arc::new(AtomicU64::new(0));
/// let counter = sent.clone();
/// let container = ListenerContainer::new();
/// container.bind(
///     "App/Listeners/SendWelcomeEmail",
///     ListenerBinding::new().method("handle", callback(move |_| {
///         counter.fetch_add(1, Ordering::SeqCst);
///         async { Ok(()) }
///     })),
/// );
///
/// let bus = EventBus::new(container);
/// bus.on("user:created", "SendWelcomeEmail").unwrap();
/// futures::executor::block_on(bus.emit("user:created", 1u64)).unwrap();
/// assert_eq!(sent.load(Ordering::SeqCst), 1);
///
/// bus.off("user:created", "SendWelcomeEmail");
/// assert!(!bus.has_listeners(Some("user:created")));
/// ```
#[derive(Clone)]
pub struct EventBus<E = EventEmitter> {
    transport: E,
    registry: Arc<ResolutionRegistry>,
}

impl EventBus<EventEmitter> {
    /// Creates a bus over the default emitter, resolving named listeners through `resolver`.
    pub fn new(resolver: impl ReferenceResolver + 'static) -> Self {
        Self::with_config(resolver, BusConfig::default())
    }

    /// Creates a bus over the default emitter using the namespace and listener limit in `config`.
    ///
    /// # Parameters
    /// * `resolver` - Resolves named listeners.
    /// * `config` - Starting namespace and `max_listeners` of the emitter.
    pub fn with_config(resolver: impl ReferenceResolver + 'static, config: BusConfig) -> Self {
        Self::with_transport(EventEmitter::new(config.max_listeners), resolver, config.namespace)
    }
}

impl Default for EventBus<EventEmitter> {
    /// A bus whose named listeners resolve against an empty [`ListenerContainer`].
    fn default() -> Self {
        Self::new(ListenerContainer::new())
    }
}

impl<E: EmitterTransport> EventBus<E> {
    /// Creates a bus dispatching through a custom transport.
    pub fn with_transport(
        transport: E,
        resolver: impl ReferenceResolver + 'static,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            registry: Arc::new(ResolutionRegistry::new(Arc::new(resolver), namespace)),
        }
    }

    /// Returns a view of the bus narrowed to the event `K` and its payload type.
    pub fn for_event<K: EventKey>(&self) -> TypedEmitter<'_, K, E> {
        TypedEmitter::new(self)
    }

    /// Adds a listener to `event_name`.
    ///
    /// # Returns
    /// * `Ok(&Self)` for chaining.
    /// * `Err(EventError::Resolve)` if a named listener could not be resolved. Nothing is registered then.
    pub fn on(&self, event_name: &str, handler: impl Into<Handler>) -> Result<&Self> {
        let callback = match handler.into() {
            Handler::Direct(callback) => callback,
            Handler::Named(reference) => {
                self.registry.resolve_event_handler(event_name, &reference)?
            }
        };
        self.add_listener(event_name, Listener::new(ListenerKey::of(&callback), callback), false);
        Ok(self)
    }

    /// Adds a listener to `event_name` that is called for the first emission only.
    ///
    /// A named listener is resolved now. Once it has run successfully, its registry entry is
    /// dropped as well. If it fails, the entry stays behind even though the listener is gone.
    pub fn once(&self, event_name: &str, handler: impl Into<Handler>) -> Result<&Self> {
        let listener = match handler.into() {
            Handler::Direct(callback) => Listener::new(ListenerKey::of(&callback), callback),
            Handler::Named(reference) => {
                let resolved = self.registry.resolve_event_handler(event_name, &reference)?;
                let key = ListenerKey::of(&resolved);
                let registry = Arc::clone(&self.registry);
                let event = event_name.to_string();
                let callback: Callback = Arc::new(move |payload: EventPayload| -> ListenerFuture {
                    let invocation = resolved(payload);
                    let registry = Arc::clone(&registry);
                    let event = event.clone();
                    let reference = reference.clone();
                    Box::pin(async move {
                        let outcome: ListenerResult = invocation.await;
                        if outcome.is_ok() {
                            registry.forget_event_handler(&event, &reference, key);
                        }
                        outcome
                    })
                });
                // Keyed by the resolved callable so `off` by reference still finds it.
                Listener::new(key, callback)
            }
        };
        self.add_listener(event_name, listener, true);
        Ok(self)
    }

    /// Adds a listener invoked for every event.
    pub fn on_any(&self, handler: impl Into<AnyHandler>) -> Result<&Self> {
        let callback = match handler.into() {
            AnyHandler::Direct(callback) => callback,
            AnyHandler::Named(reference) => self.registry.resolve_any_handler(&reference)?,
        };
        debug!(key = ?ListenerKey::of(&callback), "catch-all listener added");
        self.transport.on_any(Listener::new(ListenerKey::of(&callback), callback));
        Ok(self)
    }

    /// Emits `payload` under `event_name`.
    ///
    /// An already erased [`EventPayload`] is passed on as is, so a listener forwarding the
    /// payload it received delivers the original value.
    ///
    /// # Returns
    /// A future resolving once every current listener of the event, and every catch-all
    /// listener, has completed:
    /// * `Ok(())` if all of them succeeded.
    /// * `Err(EventError::Listener)` with the first failure otherwise.
    pub fn emit<P>(&self, event_name: &str, payload: P) -> BoxFuture<'static, Result<()>>
    where
        P: Send + Sync + 'static,
    {
        self.transport.emit(event_name, erase_payload(payload))
    }

    /// Removes a listener from `event_name`.
    ///
    /// A named listener is looked up in the registry; an unknown reference is a no-op.
    /// A callable is removed by identity.
    pub fn off(&self, event_name: &str, handler: impl Into<Handler>) {
        let key = match handler.into() {
            Handler::Direct(callback) => ListenerKey::of(&callback),
            Handler::Named(reference) => {
                match self.registry.remove_event_handler(event_name, &reference) {
                    Some(callback) => ListenerKey::of(&callback),
                    None => {
                        debug!(
                            event = event_name,
                            reference = %reference,
                            "no listener registered under reference"
                        );
                        return;
                    }
                }
            }
        };
        self.remove_listener(event_name, key);
    }

    /// Removes a catch-all listener.
    pub fn off_any(&self, handler: impl Into<AnyHandler>) {
        let key = match handler.into() {
            AnyHandler::Direct(callback) => ListenerKey::of(&callback),
            AnyHandler::Named(reference) => match self.registry.remove_any_handler(&reference) {
                Some(callback) => ListenerKey::of(&callback),
                None => {
                    debug!(reference = %reference, "no catch-all listener registered under reference");
                    return;
                }
            },
        };
        let removed = self.transport.off_any(key);
        debug!(removed, "catch-all listener removed");
    }

    /// Alias of [`off`](Self::off).
    pub fn clear_listener(&self, event_name: &str, handler: impl Into<Handler>) {
        self.off(event_name, handler);
    }

    /// Removes every listener of `event_name`, or of all events when `None`.
    ///
    /// Catch-all listeners are not touched; remove them with [`off_any`](Self::off_any).
    pub fn clear_listeners(&self, event_name: Option<&str>) {
        debug!(event = ?event_name, "clearing listeners");
        self.transport.clear_listeners(event_name);
    }

    /// Removes every listener of every event. Same as `clear_listeners(None)`.
    pub fn clear_all_listeners(&self) {
        self.clear_listeners(None);
    }

    /// Listener count of `event_name`, or of all events plus catch-all listeners when `None`.
    pub fn listener_count(&self, event_name: Option<&str>) -> usize {
        self.transport.listener_count(event_name)
    }

    /// Returns whether `event_name`, or any event or catch-all slot when `None`, has listeners.
    pub fn has_listeners(&self, event_name: Option<&str>) -> bool {
        self.listener_count(event_name) > 0
    }

    /// Gets the names of events that currently have one or more listeners.
    pub fn event_names(&self) -> Vec<String> {
        self.transport.event_names()
    }

    /// Sets the namespace later named listeners are resolved against.
    pub fn namespace(&self, namespace: impl Into<String>) -> &Self {
        self.registry.set_namespace(namespace);
        self
    }

    /// The registry remembering what each named listener resolved to.
    pub fn registry(&self) -> &ResolutionRegistry {
        &self.registry
    }

    /// The engine storing and dispatching listeners.
    pub fn transport(&self) -> &E {
        &self.transport
    }

    pub(crate) fn add_listener(&self, event_name: &str, listener: Listener, once: bool) {
        debug!(event = event_name, key = ?listener.key(), once, "listener added");
        if once {
            self.transport.once(event_name, listener);
        } else {
            self.transport.on(event_name, listener);
        }
    }

    pub(crate) fn remove_listener(&self, event_name: &str, key: ListenerKey) {
        let removed = self.transport.off(event_name, key);
        debug!(event = event_name, ?key, removed, "listener removed");
    }
}

/// Erases `payload`, unwrapping it when it already is an [`EventPayload`].
fn erase_payload<P: Send + Sync + 'static>(payload: P) -> EventPayload {
    let boxed: Box<AnyPayload> = Box::new(payload);
    match boxed.downcast::<EventPayload>() {
        Ok(shared) => *shared,
        Err(boxed) => Arc::from(boxed),
    }
}
