use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

/// Namespace used to resolve named listeners when none is configured.
pub const DEFAULT_NAMESPACE: &str = "App/Listeners";

/// Listener count per event above which the emitter warns about a possible leak.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Method invoked on a named listener when the reference does not name one.
pub const DEFAULT_METHOD: &str = "handle";

/// Type-erased payload shared by every listener of one emission.
pub type AnyPayload = dyn Any + Send + Sync;

/// Type alias for an event payload pointer.
///
/// Without a type parameter this is the erased payload the bus carries. Typed views use
/// `EventPayload<P>` for their concrete payload type.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use rs_event_bus::EventPayload;
///
/// let erased: EventPayload = Arc::new(String::from("Emitting value"));
/// let typed: EventPayload<u32> = Arc::new(7);
/// assert!(erased.downcast_ref::<String>().is_some());
/// assert_eq!(*typed, 7);
/// ```
pub type EventPayload<T = AnyPayload> = Arc<T>;

/// Error a listener may fail with.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a single listener invocation.
pub type ListenerResult = Result<(), ListenerError>;

/// Future returned by a listener invocation.
pub type ListenerFuture = BoxFuture<'static, ListenerResult>;

/// Type alias for a callback pointer.
///
/// Requires `Send + Sync` so the bus can be shared across tasks.
pub type Callback<T = AnyPayload> = Arc<dyn Fn(EventPayload<T>) -> ListenerFuture + Send + Sync>;

/// Callback invoked for every event, receiving the event name alongside the payload.
pub type AnyCallback = Arc<dyn Fn(&str, EventPayload) -> ListenerFuture + Send + Sync>;

/// Wraps an async closure into a [`Callback`] over the erased payload.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use rs_event_bus::{callback, Callback, EventPayload};
///
/// let cb: Callback = callback(|payload| async move {
///     assert!(payload.downcast_ref::<u8>().is_some());
///     Ok(())
/// });
/// let payload: EventPayload = Arc::new(1u8);
/// futures::executor::block_on(cb(payload)).unwrap();
/// ```
pub fn callback<F, Fut>(f: F) -> Callback
where
    F: Fn(EventPayload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ListenerResult> + Send + 'static,
{
    Arc::new(move |payload| -> ListenerFuture { Box::pin(f(payload)) })
}

/// Wraps an async closure into a [`Callback`] over a concrete payload type.
pub fn typed_callback<P, F, Fut>(f: F) -> Callback<P>
where
    P: Send + Sync + 'static,
    F: Fn(EventPayload<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ListenerResult> + Send + 'static,
{
    Arc::new(move |payload| -> ListenerFuture { Box::pin(f(payload)) })
}

/// Wraps an async closure into an [`AnyCallback`].
pub fn any_callback<F, Fut>(f: F) -> AnyCallback
where
    F: Fn(&str, EventPayload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ListenerResult> + Send + 'static,
{
    Arc::new(move |event: &str, payload| -> ListenerFuture { Box::pin(f(event, payload)) })
}
