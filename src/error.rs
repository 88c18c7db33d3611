use thiserror::Error;

use crate::ListenerError;

/// Result alias for bus operations.
pub type Result<T> = std::result::Result<T, EventError>;

/// Errors raised while turning a listener reference into a callable.
///
/// - `InvalidReference`: the reference string is empty or has an empty class/method segment.
/// - `NotBound`: nothing is bound under the resolved path.
/// - `MethodNotFound`: the bound listener has no method with that name.
/// - `Custom`: failure reported by a user supplied resolver.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid listener reference `{reference}`")]
    InvalidReference { reference: String },

    #[error("no listener bound at `{path}`")]
    NotBound { path: String },

    #[error("listener `{path}` has no method `{method}`")]
    MethodNotFound { path: String, method: String },

    #[error("listener reference could not be resolved: {0}")]
    Custom(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors that can occur in the event system.
///
/// - `Resolve`: registering a named listener failed to resolve it.
/// - `Listener`: a listener failed while an event was emitted.
#[derive(Error, Debug)]
pub enum EventError {
    /// Adding Listener:
    /// - The reference could not be resolved. Nothing was registered.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Emitting Event:
    /// - First listener failure of the emission, in registration order.
    #[error("listener for `{event}` failed: {source}")]
    Listener {
        event: String,
        #[source]
        source: ListenerError,
    },
}

/// A typed listener received a payload of another type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("payload for `{event}` is not a `{expected}`")]
pub struct PayloadMismatch {
    pub event: &'static str,
    pub expected: &'static str,
}
