use crate::{DEFAULT_MAX_LISTENERS, DEFAULT_NAMESPACE};

/// Settings an [`EventBus`](crate::EventBus) is built with.
///
/// # Example
/// ```
/// use rs_event_bus::BusConfig;
///
/// let config = BusConfig::default().namespace("App/Events").max_listeners(25);
/// assert_eq!(config.namespace, "App/Events");
/// assert_eq!(config.max_listeners, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Namespace named listeners are resolved against.
    pub namespace: String,
    /// Listener count per event above which a leak warning is logged. `0` disables it.
    pub max_listeners: usize,
}

impl BusConfig {
    /// Sets the namespace named listeners are resolved against.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the listener count per event above which a leak warning is logged.
    ///
    /// # Parameters
    /// * `max_listeners` - The threshold. `0` disables the warning.
    pub fn max_listeners(mut self, max_listeners: usize) -> Self {
        self.max_listeners = max_listeners;
        self
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}
