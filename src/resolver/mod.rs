//! Turning listener references such as `"User.onCreated"` into callables.
//!
//! - [`ReferenceResolver`]: the contract the registry resolves through.
//! - [`ListenerContainer`]: the default resolver, backed by explicit bindings.
//! - [`ResolutionRegistry`]: remembers what each reference resolved to, so it can be removed again.

mod container;
mod reference;
mod registry;

pub use container::{ListenerBinding, ListenerContainer};
pub use reference::ListenerReference;
pub use registry::ResolutionRegistry;

use crate::{AnyCallback, Callback, ResolveError};

/// Resolves listener references into callables.
///
/// Every call is expected to return a new callable, so that two registrations of the
/// same reference can be told apart by their [`ListenerKey`](crate::ListenerKey).
pub trait ReferenceResolver: Send + Sync {
    /// Resolves `reference` for a listener of `event_name`, relative to `namespace`.
    fn resolve_event_handler(
        &self,
        namespace: &str,
        event_name: &str,
        reference: &str,
    ) -> Result<Callback, ResolveError>;

    /// Resolves `reference` for a catch-all listener, relative to `namespace`.
    fn resolve_any_handler(&self, namespace: &str, reference: &str)
        -> Result<AnyCallback, ResolveError>;
}
