use std::fmt::{Debug, Formatter};

use crate::{AnyCallback, Callback, ListenerKey};

/// A listener given to the bus: a callable, or a reference resolved through the registry.
///
/// # Example
/// ```
/// use rs_event_bus::{callback, Handler};
///
/// assert!(matches!(Handler::from("SendWelcomeEmail"), Handler::Named(_)));
/// assert!(matches!(Handler::from(callback(|_| async { Ok(()) })), Handler::Direct(_)));
/// ```
#[derive(Clone)]
pub enum Handler {
    Direct(Callback),
    Named(String),
}

/// A catch-all listener given to the bus.
#[derive(Clone)]
pub enum AnyHandler {
    Direct(AnyCallback),
    Named(String),
}

/// A listener given to a typed view, receiving its concrete payload type.
pub enum TypedHandler<P> {
    Direct(Callback<P>),
    Named(String),
}

impl From<Callback> for Handler {
    fn from(callback: Callback) -> Self {
        Handler::Direct(callback)
    }
}

impl From<&str> for Handler {
    fn from(reference: &str) -> Self {
        Handler::Named(reference.to_string())
    }
}

impl From<String> for Handler {
    fn from(reference: String) -> Self {
        Handler::Named(reference)
    }
}

impl From<AnyCallback> for AnyHandler {
    fn from(callback: AnyCallback) -> Self {
        AnyHandler::Direct(callback)
    }
}

impl From<&str> for AnyHandler {
    fn from(reference: &str) -> Self {
        AnyHandler::Named(reference.to_string())
    }
}

impl From<String> for AnyHandler {
    fn from(reference: String) -> Self {
        AnyHandler::Named(reference)
    }
}

impl<P> From<Callback<P>> for TypedHandler<P> {
    fn from(callback: Callback<P>) -> Self {
        TypedHandler::Direct(callback)
    }
}

impl<P> From<&str> for TypedHandler<P> {
    fn from(reference: &str) -> Self {
        TypedHandler::Named(reference.to_string())
    }
}

impl<P> From<String> for TypedHandler<P> {
    fn from(reference: String) -> Self {
        TypedHandler::Named(reference)
    }
}

impl<P> Clone for TypedHandler<P> {
    fn clone(&self) -> Self {
        match self {
            TypedHandler::Direct(callback) => TypedHandler::Direct(callback.clone()),
            TypedHandler::Named(reference) => TypedHandler::Named(reference.clone()),
        }
    }
}

impl Debug for Handler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Direct(callback) => f
                .debug_tuple("Direct")
                .field(&ListenerKey::of(callback))
                .finish(),
            Handler::Named(reference) => f.debug_tuple("Named").field(reference).finish(),
        }
    }
}

impl Debug for AnyHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AnyHandler::Direct(callback) => f
                .debug_tuple("Direct")
                .field(&ListenerKey::of(callback))
                .finish(),
            AnyHandler::Named(reference) => f.debug_tuple("Named").field(reference).finish(),
        }
    }
}
