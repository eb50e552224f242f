//! Value types shared by the registry, registrar and delivery processor.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::HostUrl;
use crate::webhooks::errors::WebhookError;

/// Topics that must be configured in the Partner Dashboard and are never
/// sent to the subscription mutations.
pub const GDPR_TOPICS: [&str; 3] = ["CUSTOMERS_DATA_REQUEST", "CUSTOMERS_REDACT", "SHOP_REDACT"];

/// A webhook topic in registry form: upper case, `_` separated.
///
/// Delivery headers use `orders/create`; the GraphQL API and the registry
/// use `ORDERS_CREATE`. Both spellings normalize to the same value.
///
/// ```rust
/// use shopify_admin::webhooks::WebhookTopic;
///
/// let topic = WebhookTopic::new("orders/create");
/// assert_eq!(topic.as_str(), "ORDERS_CREATE");
/// assert_eq!(topic, WebhookTopic::new("ORDERS_CREATE"));
/// assert!(WebhookTopic::new("shop/redact").is_gdpr());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct WebhookTopic(String);

impl WebhookTopic {
    /// Normalizes `topic` into registry form.
    #[must_use]
    pub fn new(topic: impl AsRef<str>) -> Self {
        Self(topic.as_ref().trim().to_uppercase().replace('/', "_"))
    }

    /// Returns the normalized topic.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the mandatory privacy topics.
    #[must_use]
    pub fn is_gdpr(&self) -> bool {
        GDPR_TOPICS.contains(&self.0.as_str())
    }
}

impl fmt::Display for WebhookTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WebhookTopic {
    fn from(topic: &str) -> Self {
        Self::new(topic)
    }
}

impl From<String> for WebhookTopic {
    fn from(topic: String) -> Self {
        Self::new(topic)
    }
}

impl From<WebhookTopic> for String {
    fn from(topic: WebhookTopic) -> Self {
        topic.0
    }
}

/// How Shopify delivers a topic's events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMethod {
    /// HTTPS POST to the app. The entry path is appended to the app host.
    #[default]
    Http,
    /// Amazon EventBridge. The entry path is the event source ARN.
    EventBridge,
    /// Google Pub/Sub. The entry path is `pubsub://{project}:{topic}`.
    PubSub,
}

impl DeliveryMethod {
    /// Computes the endpoint address Shopify should deliver to.
    ///
    /// # Errors
    ///
    /// [`WebhookError::HostNotConfigured`] for HTTP delivery without an app
    /// host.
    pub fn build_address(
        &self,
        path: &str,
        host: Option<&HostUrl>,
    ) -> Result<String, WebhookError> {
        match self {
            Self::Http => {
                let host = host.ok_or(WebhookError::HostNotConfigured)?;
                Ok(format!("{}://{}{path}", host.scheme(), host.authority()))
            }
            Self::EventBridge | Self::PubSub => Ok(path.to_string()),
        }
    }

    /// Name of the create or update mutation for this method.
    #[must_use]
    pub const fn mutation_name(&self, update: bool) -> &'static str {
        match (self, update) {
            (Self::Http, false) => "webhookSubscriptionCreate",
            (Self::Http, true) => "webhookSubscriptionUpdate",
            (Self::EventBridge, false) => "eventBridgeWebhookSubscriptionCreate",
            (Self::EventBridge, true) => "eventBridgeWebhookSubscriptionUpdate",
            (Self::PubSub, false) => "pubSubWebhookSubscriptionCreate",
            (Self::PubSub, true) => "pubSubWebhookSubscriptionUpdate",
        }
    }

    /// The `webhookSubscription` input object literal for `address`.
    #[must_use]
    pub fn subscription_input(&self, address: &str) -> String {
        match self {
            Self::Http => format!("{{callbackUrl: {}}}", graphql_string(address)),
            Self::EventBridge => format!("{{arn: {}}}", graphql_string(address)),
            Self::PubSub => {
                let (project, topic) = split_pub_sub_address(address);
                format!(
                    "{{pubSubProject: {}, pubSubTopic: {}}}",
                    graphql_string(project),
                    graphql_string(topic)
                )
            }
        }
    }
}

/// Splits `pubsub://project:topic` into its parts.
#[must_use]
pub fn split_pub_sub_address(address: &str) -> (&str, &str) {
    let rest = address.strip_prefix("pubsub://").unwrap_or(address);
    rest.split_once(':').unwrap_or((rest, ""))
}

/// Quotes `value` as a GraphQL string literal.
pub(crate) fn graphql_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Error type returned by webhook handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Future returned by [`WebhookHandler::handle`].
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'a>>;

/// Receives verified webhook deliveries.
///
/// `topic` is in registry form, `shop_domain` comes from the delivery
/// headers and `body` is the raw payload exactly as signed.
///
/// ```rust
/// use shopify_admin::webhooks::{HandlerError, HandlerFuture, WebhookHandler};
///
/// struct OrdersHandler;
///
/// impl WebhookHandler for OrdersHandler {
///     fn handle<'a>(&'a self, _topic: &'a str, _shop: &'a str, body: &'a [u8]) -> HandlerFuture<'a> {
///         Box::pin(async move {
///             let order: serde_json::Value = serde_json::from_slice(body)?;
///             println!("order {}", order["id"]);
///             Ok::<_, HandlerError>(())
///         })
///     }
/// }
/// ```
pub trait WebhookHandler: Send + Sync {
    /// Handles one delivery. An error becomes a 500 response.
    fn handle<'a>(&'a self, topic: &'a str, shop_domain: &'a str, body: &'a [u8])
        -> HandlerFuture<'a>;
}

/// Adapter that lets a synchronous closure act as a [`WebhookHandler`].
pub struct FnHandler<F>(F);

/// Wraps a synchronous closure as a [`WebhookHandler`].
///
/// ```rust
/// use shopify_admin::webhooks::{handler_fn, WebhookRegistryEntry};
///
/// let entry = WebhookRegistryEntry::http(
///     "/webhooks",
///     handler_fn(|topic, shop, _body| {
///         println!("{topic} from {shop}");
///         Ok(())
///     }),
/// );
/// assert_eq!(entry.path, "/webhooks");
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&str, &str, &[u8]) -> Result<(), HandlerError> + Send + Sync,
{
    FnHandler(f)
}

impl<F> WebhookHandler for FnHandler<F>
where
    F: Fn(&str, &str, &[u8]) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle<'a>(
        &'a self,
        topic: &'a str,
        shop_domain: &'a str,
        body: &'a [u8],
    ) -> HandlerFuture<'a> {
        let result = (self.0)(topic, shop_domain, body);
        Box::pin(async move { result })
    }
}

/// A topic's delivery configuration and handler.
#[derive(Clone)]
pub struct WebhookRegistryEntry {
    /// Delivery mechanism.
    pub delivery_method: DeliveryMethod,
    /// Callback path, EventBridge ARN or Pub/Sub URI.
    pub path: String,
    /// Invoked for verified deliveries.
    pub handler: Arc<dyn WebhookHandler>,
}

impl WebhookRegistryEntry {
    /// Creates an entry.
    pub fn new(
        delivery_method: DeliveryMethod,
        path: impl Into<String>,
        handler: impl WebhookHandler + 'static,
    ) -> Self {
        Self {
            delivery_method,
            path: path.into(),
            handler: Arc::new(handler),
        }
    }

    /// HTTP delivery to `path` on the app host.
    pub fn http(path: impl Into<String>, handler: impl WebhookHandler + 'static) -> Self {
        Self::new(DeliveryMethod::Http, path, handler)
    }

    /// EventBridge delivery to `arn`.
    pub fn event_bridge(arn: impl Into<String>, handler: impl WebhookHandler + 'static) -> Self {
        Self::new(DeliveryMethod::EventBridge, arn, handler)
    }

    /// Pub/Sub delivery to a `pubsub://project:topic` URI.
    pub fn pub_sub(uri: impl Into<String>, handler: impl WebhookHandler + 'static) -> Self {
        Self::new(DeliveryMethod::PubSub, uri, handler)
    }
}

impl fmt::Debug for WebhookRegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookRegistryEntry")
            .field("delivery_method", &self.delivery_method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Desired state for one topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterParams {
    /// Topic to subscribe.
    pub topic: WebhookTopic,
    /// Callback path, ARN or Pub/Sub URI.
    pub path: String,
    /// Delivery mechanism.
    pub delivery_method: DeliveryMethod,
}

impl RegisterParams {
    /// Creates params for HTTP delivery.
    pub fn http(topic: impl Into<WebhookTopic>, path: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            path: path.into(),
            delivery_method: DeliveryMethod::Http,
        }
    }

    /// Uses `delivery_method` instead of HTTP.
    #[must_use]
    pub const fn delivery_method(mut self, delivery_method: DeliveryMethod) -> Self {
        self.delivery_method = delivery_method;
        self
    }
}

/// Outcome of reconciling one topic.
///
/// `result` is the raw mutation response, `{}` for a no-op, or the error
/// payload when the platform rejected the request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisterResult {
    /// Whether the topic converged to the desired state.
    pub success: bool,
    /// Response payload backing the outcome.
    pub result: Value,
}

impl RegisterResult {
    pub(crate) fn succeeded(result: Value) -> Self {
        Self {
            success: true,
            result,
        }
    }

    pub(crate) fn failed(result: Value) -> Self {
        Self {
            success: false,
            result,
        }
    }
}

/// Per-topic outcomes keyed by normalized topic.
pub type RegisterReturn = HashMap<String, RegisterResult>;

/// What to do when an existing subscription points at a different address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AddressChangeStrategy {
    /// Update the existing subscription's address. Falls back to
    /// [`Recreate`](Self::Recreate) when the update does not return a
    /// subscription, e.g. because the delivery method changed.
    #[default]
    UpdateInPlace,
    /// Create a subscription at the new address, then delete the old one.
    Recreate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_normalization() {
        assert_eq!(WebhookTopic::new("products/update").as_str(), "PRODUCTS_UPDATE");
        assert_eq!(
            WebhookTopic::new(" inventory_levels/update ").as_str(),
            "INVENTORY_LEVELS_UPDATE"
        );
        assert_eq!(WebhookTopic::from("APP_UNINSTALLED").to_string(), "APP_UNINSTALLED");
    }

    #[test]
    fn test_gdpr_detection() {
        for topic in ["customers/data_request", "CUSTOMERS_REDACT", "shop/redact"] {
            assert!(WebhookTopic::new(topic).is_gdpr(), "{topic}");
        }
        assert!(!WebhookTopic::new("orders/create").is_gdpr());
    }

    #[test]
    fn test_topic_serde_normalizes() {
        let topic: WebhookTopic = serde_json::from_str(r#""orders/paid""#).unwrap();
        assert_eq!(topic.as_str(), "ORDERS_PAID");
        assert_eq!(serde_json::to_string(&topic).unwrap(), r#""ORDERS_PAID""#);
    }

    #[test]
    fn test_http_address_uses_host() {
        let host = HostUrl::new("https://app.example.com").unwrap();
        let address = DeliveryMethod::Http
            .build_address("/webhooks", Some(&host))
            .unwrap();
        assert_eq!(address, "https://app.example.com/webhooks");

        let local = HostUrl::new("http://localhost:3000").unwrap();
        assert_eq!(
            DeliveryMethod::Http.build_address("/hooks", Some(&local)).unwrap(),
            "http://localhost:3000/hooks"
        );
    }

    #[test]
    fn test_http_address_requires_host() {
        assert!(matches!(
            DeliveryMethod::Http.build_address("/webhooks", None),
            Err(WebhookError::HostNotConfigured)
        ));
        assert_eq!(
            DeliveryMethod::EventBridge
                .build_address("arn:aws:events:us-east-1::event-source/x", None)
                .unwrap(),
            "arn:aws:events:us-east-1::event-source/x"
        );
    }

    #[test]
    fn test_mutation_names() {
        assert_eq!(DeliveryMethod::Http.mutation_name(false), "webhookSubscriptionCreate");
        assert_eq!(
            DeliveryMethod::EventBridge.mutation_name(true),
            "eventBridgeWebhookSubscriptionUpdate"
        );
        assert_eq!(
            DeliveryMethod::PubSub.mutation_name(false),
            "pubSubWebhookSubscriptionCreate"
        );
    }

    #[test]
    fn test_subscription_inputs() {
        assert_eq!(
            DeliveryMethod::Http.subscription_input("https://app.example.com/webhooks"),
            r#"{callbackUrl: "https://app.example.com/webhooks"}"#
        );
        assert_eq!(
            DeliveryMethod::EventBridge.subscription_input("arn:test"),
            r#"{arn: "arn:test"}"#
        );
        assert_eq!(
            DeliveryMethod::PubSub.subscription_input("pubsub://my-project-id:my-topic-id"),
            r#"{pubSubProject: "my-project-id", pubSubTopic: "my-topic-id"}"#
        );
    }

    #[test]
    fn test_graphql_string_escapes_quotes() {
        assert_eq!(graphql_string(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[tokio::test]
    async fn test_fn_handler_passes_arguments() {
        let handler = handler_fn(|topic, shop, body| {
            assert_eq!(topic, "ORDERS_CREATE");
            assert_eq!(shop, "shop.myshopify.com");
            assert_eq!(body, b"{}");
            Ok(())
        });
        handler
            .handle("ORDERS_CREATE", "shop.myshopify.com", b"{}")
            .await
            .unwrap();
    }

    #[test]
    fn test_entry_debug_omits_handler() {
        let entry = WebhookRegistryEntry::pub_sub("pubsub://p:t", handler_fn(|_, _, _| Ok(())));
        let debug = format!("{entry:?}");
        assert!(debug.contains("PubSub"));
        assert!(debug.contains("pubsub://p:t"));
    }
}
