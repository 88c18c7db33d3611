use std::fmt::{Debug, Formatter};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::{AnyCallback, Callback, EventPayload, ListenerFuture};

/// Identity of a registered callable.
///
/// Two listeners are the same listener when they were built from the same `Arc` allocation,
/// which is how `off` finds what `on` registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey(usize);

impl ListenerKey {
    /// Key of the allocation behind `callable`.
    ///
    /// # Example
    /// ```
    /// use rs_event_bus::{callback, ListenerKey};
    ///
    /// let a = callback(|_| async { Ok(()) });
    /// let b = callback(|_| async { Ok(()) });
    /// assert_eq!(ListenerKey::of(&a), ListenerKey::of(&a.clone()));
    /// assert_ne!(ListenerKey::of(&a), ListenerKey::of(&b));
    /// ```
    pub fn of<T: ?Sized>(callable: &Arc<T>) -> Self {
        Self(Arc::as_ptr(callable) as *const () as usize)
    }
}

/// A handle for an event listener callback.
///
/// `Listener<C>` wraps a callback, the key it is removed by, and an optional call budget,
/// allowing for one-shot or unlimited listeners. `C` is [`Callback`] for per-event
/// listeners and [`AnyCallback`] for catch-all ones.
///
/// # Thread Safety
///
/// The call budget is claimed atomically, so a one-shot listener runs at most once even
/// when emissions race.
pub struct Listener<C = Callback> {
    key: ListenerKey,
    callback: C,
    lifetime: Option<Arc<AtomicU64>>,
}

/// Listener registered on the catch-all channel.
pub type AnyListener = Listener<AnyCallback>;

impl<C> Listener<C> {
    /// Create an unlimited listener removed by `key`.
    pub fn new(key: ListenerKey, callback: C) -> Self {
        Self { key, callback, lifetime: None }
    }

    /// Create a listener that is called at most once.
    pub fn once(key: ListenerKey, callback: C) -> Self {
        Self { key, callback, lifetime: Some(Arc::new(AtomicU64::new(1))) }
    }

    /// Gives an unlimited listener a single call; a limited one keeps its budget.
    pub(crate) fn limited_to_once(mut self) -> Self {
        if self.lifetime.is_none() {
            self.lifetime = Some(Arc::new(AtomicU64::new(1)));
        }
        self
    }

    pub fn key(&self) -> ListenerKey {
        self.key
    }

    /// Returns whether the listener has used up its call budget.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use rs_event_bus::{callback, EventPayload, Listener, ListenerKey};
    ///
    /// let cb = callback(|_| async { Ok(()) });
    /// let listener = Listener::once(ListenerKey::of(&cb), cb);
    /// assert!(!listener.at_limit());
    /// let payload: EventPayload = Arc::new(());
    /// let _ = listener.call(payload);
    /// assert!(listener.at_limit());
    /// ```
    #[inline]
    pub fn at_limit(&self) -> bool {
        match self.lifetime {
            None => false,
            Some(ref lifetime) => lifetime.load(Ordering::SeqCst) == 0,
        }
    }

    /// Returns the number of remaining calls, or `None` for an unlimited listener.
    pub fn remaining_calls(&self) -> Option<u64> {
        self.lifetime.as_ref().map(|l| l.load(Ordering::SeqCst))
    }

    /// Consume one call from the budget. `false` when the listener is exhausted.
    #[inline]
    pub(crate) fn claim(&self) -> bool {
        match self.lifetime {
            None => true,
            Some(ref lifetime) => lifetime
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |x| x.checked_sub(1))
                .is_ok(),
        }
    }
}

impl Listener<Callback> {
    /// Invoke the callback with the given payload.
    ///
    /// # Returns
    /// `Some(future)` if the callback was invoked, `None` if the listener is at its limit.
    #[inline]
    #[must_use]
    pub fn call(&self, payload: EventPayload) -> Option<ListenerFuture> {
        if !self.claim() {
            return None;
        }
        Some(self.invoke(payload))
    }

    /// Invoke the callback without touching the call budget.
    #[inline]
    pub(crate) fn invoke(&self, payload: EventPayload) -> ListenerFuture {
        (self.callback)(payload)
    }
}

impl Listener<AnyCallback> {
    /// Invoke the catch-all callback with the event name and payload.
    #[inline]
    #[must_use]
    pub fn call(&self, event: &str, payload: EventPayload) -> Option<ListenerFuture> {
        if !self.claim() {
            return None;
        }
        Some(self.invoke(event, payload))
    }

    /// Invoke the catch-all callback without touching the call budget.
    #[inline]
    pub(crate) fn invoke(&self, event: &str, payload: EventPayload) -> ListenerFuture {
        (self.callback)(event, payload)
    }
}

impl<C: Clone> Clone for Listener<C> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            callback: self.callback.clone(),
            lifetime: self.lifetime.as_ref().map(Arc::clone),
        }
    }
}

impl<C> Debug for Listener<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("key", &self.key)
            .field("lifetime", &self.remaining_calls())
            .finish()
    }
}

impl<C> PartialEq for Listener<C> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl<C> Eq for Listener<C> {}
