use futures::future::BoxFuture;

use crate::{AnyListener, EventError, EventPayload, Listener, ListenerKey};

/// Defines the contract of the asynchronous engine the bus stores and dispatches listeners with.
///
/// The bus only ever hands concrete listeners to a transport; resolving named listeners is
/// done before anything reaches it.
///
/// # Thread Safety
/// All implementors must be `Send + Sync`.
pub trait EmitterTransport: Send + Sync {
    /// Adds a listener to the specified event.
    fn on(&self, event_name: &str, listener: Listener);

    /// Adds a listener that is removed after its first delivery.
    ///
    /// Implementations must remove the listener on their own once it fired.
    fn once(&self, event_name: &str, listener: Listener);

    /// Adds a listener invoked for every emitted event.
    fn on_any(&self, listener: AnyListener);

    /// Removes every listener of the specified event registered under `key`.
    ///
    /// # Returns
    /// The number of listeners removed. Zero is not an error.
    fn off(&self, event_name: &str, key: ListenerKey) -> usize;

    /// Removes every catch-all listener registered under `key`.
    fn off_any(&self, key: ListenerKey) -> usize;

    /// Emits the specified event.
    ///
    /// # Returns
    /// A future resolving once every listener of this emission completed:
    /// * `Ok(())` if all of them succeeded (or there were none).
    /// * `Err(EventError::Listener)` with the first failure otherwise.
    fn emit(&self, event_name: &str, payload: EventPayload)
        -> BoxFuture<'static, Result<(), EventError>>;

    /// Removes all listeners of one event, or of every event when `event_name` is `None`.
    ///
    /// Catch-all listeners are left in place either way.
    fn clear_listeners(&self, event_name: Option<&str>);

    /// Counts the listeners of one event, or of every event plus the catch-all listeners
    /// when `event_name` is `None`.
    fn listener_count(&self, event_name: Option<&str>) -> usize;

    /// Gets the names of events that currently have one or more listeners.
    fn event_names(&self) -> Vec<String>;
}
