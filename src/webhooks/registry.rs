//! In-memory topic to handler mapping.

use std::collections::HashMap;

use crate::webhooks::types::{WebhookRegistryEntry, WebhookTopic};

/// Handlers keyed by normalized topic.
///
/// The registry is an ordinary owned value: build it at startup, pass it to
/// [`WebhookRegistrar::register_all`](crate::webhooks::WebhookRegistrar::register_all)
/// and [`process`](Self::process), and share it behind an `Arc` (or
/// `Arc<RwLock<_>>` if it must change at runtime).
///
/// ```rust
/// use shopify_admin::webhooks::{handler_fn, WebhookRegistry, WebhookRegistryEntry};
///
/// let mut registry = WebhookRegistry::new();
/// registry
///     .add_handler("orders/create", WebhookRegistryEntry::http("/webhooks", handler_fn(|_, _, _| Ok(()))))
///     .add_handler("APP_UNINSTALLED", WebhookRegistryEntry::http("/webhooks", handler_fn(|_, _, _| Ok(()))));
///
/// assert!(registry.get_handler("ORDERS_CREATE").is_some());
/// assert_eq!(registry.topics().len(), 2);
/// assert!(registry.is_webhook_path("/webhooks"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct WebhookRegistry {
    entries: HashMap<WebhookTopic, WebhookRegistryEntry>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WebhookRegistry>();
};

impl WebhookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entry for `topic`, replacing any previous one.
    pub fn add_handler(
        &mut self,
        topic: impl Into<WebhookTopic>,
        entry: WebhookRegistryEntry,
    ) -> &mut Self {
        let topic = topic.into();
        if self.entries.insert(topic.clone(), entry).is_some() {
            tracing::debug!(topic = %topic, "Replaced webhook handler");
        }
        self
    }

    /// Adds several entries with [`add_handler`](Self::add_handler).
    pub fn add_handlers<I, T>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (T, WebhookRegistryEntry)>,
        T: Into<WebhookTopic>,
    {
        for (topic, entry) in entries {
            self.add_handler(topic, entry);
        }
        self
    }

    /// Looks up the entry for `topic` in either spelling.
    #[must_use]
    pub fn get_handler(&self, topic: &str) -> Option<&WebhookRegistryEntry> {
        self.entries.get(&WebhookTopic::new(topic))
    }

    /// Returns all registered topics, sorted.
    #[must_use]
    pub fn topics(&self) -> Vec<WebhookTopic> {
        let mut topics: Vec<_> = self.entries.keys().cloned().collect();
        topics.sort();
        topics
    }

    /// Number of registered topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// `true` if any entry uses `path`.
    #[must_use]
    pub fn is_webhook_path(&self, path: &str) -> bool {
        self.entries.values().any(|entry| entry.path == path)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&WebhookTopic, &WebhookRegistryEntry)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}
