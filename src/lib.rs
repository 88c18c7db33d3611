//! # Rust Event Bus Crate
//!
//! An asynchronous publish/subscribe event bus whose listeners can be given as callables or
//! as string references resolved through a container.
//!
//! - **EventBus**: `on`/`once`/`on_any`/`off`/`off_any`/`emit` over one event space.
//! - **ResolutionRegistry**: resolves references like `"User.onCreated"` and remembers the
//!   result, so `off` with the same reference removes the right listener.
//! - **TypedEmitter**: a view of the bus fixed to one event and its payload type.
//! - **EventEmitter**: the default engine storing and dispatching listeners, behind the
//!   `EmitterTransport` trait.
//!
//! The crate logs through `tracing` and never installs a subscriber itself.

mod bus;
mod config;
mod constants;
mod emitter;
mod error;
mod handler;
mod resolver;
mod typed;

pub use bus::EventBus;
pub use config::BusConfig;
pub use constants::*;
pub use emitter::{AnyListener, EmitterTransport, EventEmitter, Listener, ListenerKey};
pub use error::{EventError, PayloadMismatch, ResolveError, Result};
pub use handler::{AnyHandler, Handler, TypedHandler};
pub use resolver::{
    ListenerBinding, ListenerContainer, ListenerReference, ReferenceResolver, ResolutionRegistry,
};
pub use typed::{EventKey, TypedEmitter};

#[cfg(test)]
mod tests;
