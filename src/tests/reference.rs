use crate::{ListenerReference, ResolveError};

fn parse(namespace: &str, reference: &str) -> ListenerReference {
    ListenerReference::parse(namespace, reference).unwrap()
}

#[test]
fn class_and_method_resolve_under_the_namespace() {
    let reference = parse("App/Listeners", "User.onCreated");
    assert_eq!(reference.path, "App/Listeners/User");
    assert_eq!(reference.method, "onCreated");
}

#[test]
fn method_defaults_to_handle() {
    let reference = parse("App/Listeners", "SendWelcomeEmail");
    assert_eq!(reference.path, "App/Listeners/SendWelcomeEmail");
    assert_eq!(reference.method, "handle");
}

#[test]
fn nested_class_paths_keep_their_segments() {
    let reference = parse("App/Listeners/", "Billing/Invoice.paid");
    assert_eq!(reference.path, "App/Listeners/Billing/Invoice");
    assert_eq!(reference.method, "paid");
}

#[test]
fn leading_slash_ignores_the_namespace() {
    let reference = parse("App/Listeners", "/Mail/Welcome.send");
    assert_eq!(reference.path, "Mail/Welcome");
    assert_eq!(reference.method, "send");
}

#[test]
fn empty_namespace_uses_the_class_alone() {
    assert_eq!(parse("", "Audit").path, "Audit");
}

#[test]
fn malformed_references_are_rejected() {
    for reference in ["", "   ", "User.", ".handle", "/", "/.handle"] {
        assert!(
            matches!(
                ListenerReference::parse("App/Listeners", reference),
                Err(ResolveError::InvalidReference { .. })
            ),
            "`{reference}` should be rejected"
        );
    }
}
