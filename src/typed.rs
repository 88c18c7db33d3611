use futures::future::{self, BoxFuture};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::{
    Callback, EmitterTransport, EventBus, EventEmitter, EventPayload, Handler, Listener,
    ListenerError, ListenerFuture, ListenerKey, PayloadMismatch, Result, TypedHandler,
};

/// Associates an event name with the payload type emitted under it.
///
/// # Example
/// ```
/// use rs_event_bus::EventKey;
///
/// struct UserCreated;
///
/// impl EventKey for UserCreated {
///     const NAME: &'static str = "user:created";
///     type Payload = u64;
/// }
/// ```
pub trait EventKey: 'static {
    const NAME: &'static str;
    type Payload: Send + Sync + 'static;
}

/// A view of an [`EventBus`] fixed to the event `K`.
///
/// Holds no state of its own. Callables registered here receive `K::Payload` directly;
/// named listeners are resolved exactly as they are on the bus.
pub struct TypedEmitter<'a, K, E = EventEmitter> {
    bus: &'a EventBus<E>,
    _event: PhantomData<fn() -> K>,
}

impl<'a, K: EventKey, E: EmitterTransport> TypedEmitter<'a, K, E> {
    /// Creates a view of `bus` for the event `K`. Same as [`EventBus::for_event`].
    pub fn new(bus: &'a EventBus<E>) -> Self {
        Self { bus, _event: PhantomData }
    }

    /// The event name this view registers and emits under.
    pub fn event_name(&self) -> &'static str {
        K::NAME
    }

    /// Adds a listener to the event `K`.
    ///
    /// # Parameters
    /// * `handler` - A callable taking `EventPayload<K::Payload>`, or a listener reference.
    ///
    /// # Returns
    /// * `Ok(&Self)` for chaining.
    /// * `Err(EventError::Resolve)` if a named listener could not be resolved.
    pub fn on(&self, handler: impl Into<TypedHandler<K::Payload>>) -> Result<&Self> {
        match handler.into() {
            TypedHandler::Direct(callback) => {
                self.bus.add_listener(K::NAME, Self::erase(callback), false);
            }
            TypedHandler::Named(reference) => {
                self.bus.on(K::NAME, Handler::Named(reference))?;
            }
        }
        Ok(self)
    }

    /// Adds a listener to the event `K` that is called for the first emission only.
    ///
    /// # Returns
    /// * `Ok(&Self)` for chaining.
    /// * `Err(EventError::Resolve)` if a named listener could not be resolved.
    pub fn once(&self, handler: impl Into<TypedHandler<K::Payload>>) -> Result<&Self> {
        match handler.into() {
            TypedHandler::Direct(callback) => {
                self.bus.add_listener(K::NAME, Self::erase(callback), true);
            }
            TypedHandler::Named(reference) => {
                self.bus.once(K::NAME, Handler::Named(reference))?;
            }
        }
        Ok(self)
    }

    /// Removes a listener from the event `K`, by identity for callables and through the
    /// registry for references. Unknown listeners are ignored.
    pub fn off(&self, handler: impl Into<TypedHandler<K::Payload>>) {
        match handler.into() {
            TypedHandler::Direct(callback) => {
                self.bus.remove_listener(K::NAME, ListenerKey::of(&callback));
            }
            TypedHandler::Named(reference) => self.bus.off(K::NAME, Handler::Named(reference)),
        }
    }

    /// Emits `payload` under `K::NAME`.
    ///
    /// # Returns
    /// A future resolving once every listener completed, with the first failure if any.
    pub fn emit(&self, payload: K::Payload) -> BoxFuture<'static, Result<()>> {
        self.bus.emit(K::NAME, payload)
    }

    /// Number of listeners registered for `K`, typed or not.
    pub fn listener_count(&self) -> usize {
        self.bus.listener_count(Some(K::NAME))
    }

    /// Returns whether the event `K` has any listener.
    pub fn has_listeners(&self) -> bool {
        self.listener_count() > 0
    }

    /// Adapts a typed callback to the erased payload, keeping the typed callback's identity.
    fn erase(callback: Callback<K::Payload>) -> Listener {
        let key = ListenerKey::of(&callback);
        let erased: Callback = Arc::new(move |payload: EventPayload| -> ListenerFuture {
            match payload.downcast::<K::Payload>() {
                Ok(typed) => callback(typed),
                Err(_) => {
                    let mismatch: ListenerError = PayloadMismatch {
                        event: K::NAME,
                        expected: std::any::type_name::<K::Payload>(),
                    }
                    .into();
                    Box::pin(future::ready(Err(mismatch)))
                }
            }
        });
        Listener::new(key, erased)
    }
}
