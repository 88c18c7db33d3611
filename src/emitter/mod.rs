mod event_emitter;
mod listener;
mod transport;

pub use event_emitter::EventEmitter;
pub use listener::{AnyListener, Listener, ListenerKey};
pub use transport::EmitterTransport;
