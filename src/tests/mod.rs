mod reference;
mod registry;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use crate::{
    any_callback, callback, AnyCallback, Callback, ListenerBinding, ListenerContainer,
};

/// Callback counting its invocations.
fn counting(counter: &Arc<AtomicU64>) -> Callback {
    let counter = Arc::clone(counter);
    callback(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    })
}

/// Catch-all callback recording the event names it saw.
fn recording_any(seen: &Arc<Mutex<Vec<String>>>) -> AnyCallback {
    let seen = Arc::clone(seen);
    any_callback(move |event, _| {
        seen.lock().unwrap().push(event.to_string());
        async { Ok(()) }
    })
}

/// Callback recording every `u64` payload it receives.
fn recording(seen: &Arc<Mutex<Vec<u64>>>) -> Callback {
    let seen = Arc::clone(seen);
    callback(move |payload| {
        if let Some(value) = payload.downcast_ref::<u64>() {
            seen.lock().unwrap().push(*value);
        }
        async { Ok(()) }
    })
}

fn failing() -> Callback {
    callback(|_| async { Err("listener exploded".into()) })
}

fn count(counter: &Arc<AtomicU64>) -> u64 {
    counter.load(Ordering::SeqCst)
}

/// Container with `SendWelcomeEmail` bound under the default namespace.
fn welcome_container(sent: &Arc<Mutex<Vec<u64>>>) -> ListenerContainer {
    let container = ListenerContainer::new();
    container.bind(
        "App/Listeners/SendWelcomeEmail",
        ListenerBinding::new().method("handle", recording(sent)),
    );
    container
}
