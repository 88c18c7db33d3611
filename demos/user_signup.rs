//! Example: named and typed listeners around a user signup flow
use std::sync::Arc;

use rs_event_bus::{
    any_callback, callback, typed_callback, EventBus, EventKey, ListenerBinding,
    ListenerContainer,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct NewUser {
    email: String,
}

struct UserCreated;

impl EventKey for UserCreated {
    const NAME: &'static str = "user:created";
    type Payload = NewUser;
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let container = ListenerContainer::new();
    container
        .bind(
            "App/Listeners/SendWelcomeEmail",
            ListenerBinding::new().method(
                "handle",
                callback(|payload| async move {
                    if let Some(user) = payload.downcast_ref::<NewUser>() {
                        println!("Welcome mail queued for {}", user.email);
                    }
                    Ok(())
                }),
            ),
        )
        .bind(
            "App/Listeners/Audit",
            ListenerBinding::new().any_method(
                "record",
                any_callback(|event, _| {
                    println!("Audit: {event}");
                    async { Ok(()) }
                }),
            ),
        );

    let bus = EventBus::new(container);
    bus.on("user:created", "SendWelcomeEmail")?.on_any("Audit.record")?;

    let users = bus.for_event::<UserCreated>();
    users.once(typed_callback(|user: Arc<NewUser>| async move {
        println!("First signup ever: {}", user.email);
        Ok(())
    }))?;

    users.emit(NewUser { email: "alice@example.com".to_string() }).await?;
    users.emit(NewUser { email: "bob@example.com".to_string() }).await?;

    bus.off("user:created", "SendWelcomeEmail");
    bus.off_any("Audit.record");
    println!("Listeners left: {}", bus.listener_count(None));
    Ok(())
}
