use crate::{ResolveError, DEFAULT_METHOD};

/// A parsed listener reference: the path a listener is bound at and the method to call.
///
/// # Example
/// ```
/// use rs_event_bus::ListenerReference;
///
/// let reference = ListenerReference::parse("App/Listeners", "User.onCreated").unwrap();
/// assert_eq!(reference.path, "App/Listeners/User");
/// assert_eq!(reference.method, "onCreated");
///
/// let reference = ListenerReference::parse("App/Listeners", "/Mail/Welcome").unwrap();
/// assert_eq!(reference.path, "Mail/Welcome");
/// assert_eq!(reference.method, "handle");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerReference {
    pub path: String,
    pub method: String,
}

impl ListenerReference {
    /// Parses `reference` relative to `namespace`.
    ///
    /// - `Class.method` binds `method` on `<namespace>/Class`.
    /// - Without a `.`, the method is `handle`.
    /// - A leading `/` makes the reference absolute and the namespace is ignored.
    pub fn parse(namespace: &str, reference: &str) -> Result<Self, ResolveError> {
        let invalid = || ResolveError::InvalidReference { reference: reference.to_string() };

        let trimmed = reference.trim();
        let (class, method) = trimmed.rsplit_once('.').unwrap_or((trimmed, DEFAULT_METHOD));
        let (class, absolute) = match class.strip_prefix('/') {
            Some(class) => (class, true),
            None => (class, false),
        };
        if class.is_empty() || method.is_empty() {
            return Err(invalid());
        }

        let namespace = namespace.trim_end_matches('/');
        let path = if absolute || namespace.is_empty() {
            class.to_string()
        } else {
            format!("{namespace}/{class}")
        };
        Ok(Self { path, method: method.to_string() })
    }
}
