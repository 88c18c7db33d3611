use super::*;
use crate::{
    EventPayload, ListenerKey, ReferenceResolver, ResolutionRegistry, ResolveError,
    DEFAULT_NAMESPACE,
};

fn registry(container: ListenerContainer) -> ResolutionRegistry {
    ResolutionRegistry::new(Arc::new(container), DEFAULT_NAMESPACE)
}

fn greeter_container(app: &Arc<AtomicU64>, admin: &Arc<AtomicU64>) -> ListenerContainer {
    let container = ListenerContainer::new();
    container
        .bind("App/Listeners/Greeter", ListenerBinding::new().method("handle", counting(app)))
        .bind("Admin/Listeners/Greeter", ListenerBinding::new().method("handle", counting(admin)));
    container
}

fn payload() -> EventPayload {
    Arc::new(0u64)
}

mod container {
    use super::*;

    #[tokio::test]
    async fn resolves_a_bound_method() {
        let called = Arc::new(AtomicU64::new(0));
        let container = ListenerContainer::new();
        container.bind("App/Listeners/User", ListenerBinding::new().method("onCreated", counting(&called)));

        let handler = container
            .resolve_event_handler(DEFAULT_NAMESPACE, "user:created", "User.onCreated")
            .unwrap();
        handler(payload()).await.unwrap();

        assert_eq!(count(&called), 1);
    }

    #[test]
    fn every_resolution_is_a_new_callable() {
        let called = Arc::new(AtomicU64::new(0));
        let container = ListenerContainer::new();
        container.bind("App/Listeners/User", ListenerBinding::new().method("handle", counting(&called)));

        let first = container.resolve_event_handler(DEFAULT_NAMESPACE, "e", "User").unwrap();
        let second = container.resolve_event_handler(DEFAULT_NAMESPACE, "e", "User").unwrap();

        assert_ne!(ListenerKey::of(&first), ListenerKey::of(&second));
    }

    #[test]
    fn unknown_paths_and_methods_fail() {
        let called = Arc::new(AtomicU64::new(0));
        let container = ListenerContainer::new();
        container.bind("App/Listeners/User", ListenerBinding::new().method("handle", counting(&called)));

        assert!(matches!(
            container.resolve_event_handler(DEFAULT_NAMESPACE, "e", "Missing"),
            Err(ResolveError::NotBound { path }) if path == "App/Listeners/Missing"
        ));
        assert!(matches!(
            container.resolve_event_handler(DEFAULT_NAMESPACE, "e", "User.onDeleted"),
            Err(ResolveError::MethodNotFound { method, .. }) if method == "onDeleted"
        ));
    }

    #[tokio::test]
    async fn catch_all_methods_are_kept_apart() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let called = Arc::new(AtomicU64::new(0));
        let container = ListenerContainer::new();
        container.bind(
            "App/Listeners/Audit",
            ListenerBinding::new()
                .method("handle", counting(&called))
                .any_method("record", recording_any(&seen)),
        );

        let any = container.resolve_any_handler(DEFAULT_NAMESPACE, "Audit.record").unwrap();
        any("user:created", payload()).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["user:created".to_string()]);

        assert!(matches!(
            container.resolve_any_handler(DEFAULT_NAMESPACE, "Audit"),
            Err(ResolveError::MethodNotFound { .. })
        ));
        assert!(matches!(
            container.resolve_event_handler(DEFAULT_NAMESPACE, "e", "Audit.record"),
            Err(ResolveError::MethodNotFound { .. })
        ));
    }

    #[test]
    fn unbinding_stops_later_resolutions() {
        let called = Arc::new(AtomicU64::new(0));
        let container = ListenerContainer::new();
        container.bind("App/Listeners/User", ListenerBinding::new().method("handle", counting(&called)));
        assert!(container.is_bound("App/Listeners/User"));

        let binding = container.unbind("App/Listeners/User").unwrap();
        assert!(binding.has_method("handle"));
        assert!(container.resolve_event_handler(DEFAULT_NAMESPACE, "e", "User").is_err());
    }
}

#[test]
fn resolving_records_the_returned_callable() {
    let app = Arc::new(AtomicU64::new(0));
    let admin = Arc::new(AtomicU64::new(0));
    let registry = registry(greeter_container(&app, &admin));

    let handler = registry.resolve_event_handler("user:created", "Greeter").unwrap();
    let recorded = registry.event_handler("user:created", "Greeter").unwrap();
    assert_eq!(ListenerKey::of(&handler), ListenerKey::of(&recorded));

    let removed = registry.remove_event_handler("user:created", "Greeter").unwrap();
    assert_eq!(ListenerKey::of(&handler), ListenerKey::of(&removed));
    assert!(registry.remove_event_handler("user:created", "Greeter").is_none());
    assert!(registry.is_empty());
}

#[test]
fn entries_are_keyed_by_event_and_reference() {
    let app = Arc::new(AtomicU64::new(0));
    let admin = Arc::new(AtomicU64::new(0));
    let registry = registry(greeter_container(&app, &admin));

    let created = registry.resolve_event_handler("user:created", "Greeter").unwrap();
    let deleted = registry.resolve_event_handler("user:deleted", "Greeter").unwrap();
    assert_ne!(ListenerKey::of(&created), ListenerKey::of(&deleted));
    assert_eq!(registry.len(), 2);

    let removed = registry.remove_event_handler("user:deleted", "Greeter").unwrap();
    assert_eq!(ListenerKey::of(&removed), ListenerKey::of(&deleted));
    assert!(registry.event_handler("user:created", "Greeter").is_some());
}

#[test]
fn resolving_the_same_pair_again_replaces_the_entry() {
    let app = Arc::new(AtomicU64::new(0));
    let admin = Arc::new(AtomicU64::new(0));
    let registry = registry(greeter_container(&app, &admin));

    let first = registry.resolve_event_handler("user:created", "Greeter").unwrap();
    let second = registry.resolve_event_handler("user:created", "Greeter").unwrap();
    assert_ne!(ListenerKey::of(&first), ListenerKey::of(&second));
    assert_eq!(registry.len(), 1);

    let removed = registry.remove_event_handler("user:created", "Greeter").unwrap();
    assert_eq!(ListenerKey::of(&removed), ListenerKey::of(&second));
}

#[test]
fn failed_resolution_records_nothing() {
    let app = Arc::new(AtomicU64::new(0));
    let admin = Arc::new(AtomicU64::new(0));
    let registry = registry(greeter_container(&app, &admin));

    assert!(matches!(
        registry.resolve_event_handler("user:created", "Nope"),
        Err(ResolveError::NotBound { .. })
    ));
    assert!(registry.resolve_any_handler("").is_err());
    assert!(registry.is_empty());
}

#[tokio::test]
async fn namespace_changes_only_affect_later_resolutions() {
    let app = Arc::new(AtomicU64::new(0));
    let admin = Arc::new(AtomicU64::new(0));
    let registry = registry(greeter_container(&app, &admin));
    assert_eq!(registry.namespace(), "App/Listeners");

    registry.resolve_event_handler("user:created", "Greeter").unwrap();
    registry.set_namespace("Admin/Listeners");
    assert_eq!(registry.namespace(), "Admin/Listeners");

    let recorded = registry.event_handler("user:created", "Greeter").unwrap();
    recorded(payload()).await.unwrap();
    assert_eq!((count(&app), count(&admin)), (1, 0));

    let fresh = registry.resolve_event_handler("user:deleted", "Greeter").unwrap();
    fresh(payload()).await.unwrap();
    assert_eq!((count(&app), count(&admin)), (1, 1));
}

#[test]
fn forgetting_requires_the_recorded_callable() {
    let app = Arc::new(AtomicU64::new(0));
    let admin = Arc::new(AtomicU64::new(0));
    let registry = registry(greeter_container(&app, &admin));

    let stale = registry.resolve_event_handler("user:created", "Greeter").unwrap();
    let current = registry.resolve_event_handler("user:created", "Greeter").unwrap();

    assert!(!registry.forget_event_handler("user:created", "Greeter", ListenerKey::of(&stale)));
    assert!(registry.event_handler("user:created", "Greeter").is_some());
    assert!(registry.forget_event_handler("user:created", "Greeter", ListenerKey::of(&current)));
    assert!(registry.is_empty());
}

#[test]
fn catch_all_entries_are_keyed_by_reference_only() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let container = ListenerContainer::new();
    container.bind("App/Listeners/Audit", ListenerBinding::new().any_method("handle", recording_any(&seen)));
    let registry = registry(container);

    let handler = registry.resolve_any_handler("Audit").unwrap();
    let recorded = registry.any_handler("Audit").unwrap();
    assert_eq!(ListenerKey::of(&handler), ListenerKey::of(&recorded));
    assert!(registry.event_handler("Audit", "Audit").is_none());

    let removed = registry.remove_any_handler("Audit").unwrap();
    assert_eq!(ListenerKey::of(&handler), ListenerKey::of(&removed));
    assert!(registry.remove_any_handler("Audit").is_none());
}

#[test]
fn default_registry_resolves_nothing() {
    let registry = ResolutionRegistry::default();
    assert_eq!(registry.namespace(), DEFAULT_NAMESPACE);
    assert!(registry.resolve_event_handler("e", "Anything").is_err());
}
