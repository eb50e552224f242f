//! Webhook registration and delivery.
//!
//! The pieces fit together in two phases:
//!
//! 1. **Configure**: build a [`WebhookRegistry`] at startup, mapping each
//!    topic to a [`WebhookRegistryEntry`] (delivery method, path, handler).
//! 2. **Sync**: once a shop session is available, call
//!    [`WebhookRegistrar::register_all`] to converge the shop's subscriptions
//!    with the registry. Only topics whose endpoint differs are written.
//!
//! Inbound deliveries go through [`WebhookRegistry::process`], which checks
//! the body, the required headers and the HMAC signature before dispatching
//! to the topic's handler.
//!
//! # Example
//!
//! ```rust
//! use shopify_admin::webhooks::{
//!     handler_fn, WebhookRegistry, WebhookRegistryEntry, WebhookRequest, HEADER_HMAC,
//!     HEADER_SHOP_DOMAIN, HEADER_TOPIC,
//! };
//! use shopify_admin::auth::hmac::compute_signature_base64;
//! use shopify_admin::{ApiKey, ApiSecretKey, ShopifyConfig};
//!
//! # tokio_test::block_on(async {
//! let config = ShopifyConfig::builder()
//!     .api_key(ApiKey::new("key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("secret").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let mut registry = WebhookRegistry::new();
//! registry.add_handler(
//!     "orders/create",
//!     WebhookRegistryEntry::http("/webhooks", handler_fn(|_topic, _shop, _body| Ok(()))),
//! );
//!
//! let body = br#"{"id":1}"#;
//! let request = WebhookRequest::new(
//!     body.to_vec(),
//!     [
//!         (HEADER_HMAC, compute_signature_base64(body, "secret")),
//!         (HEADER_TOPIC, "orders/create".to_string()),
//!         (HEADER_SHOP_DOMAIN, "shop.myshopify.com".to_string()),
//!     ],
//! );
//!
//! let response = registry.process(&config, &request).await.unwrap();
//! assert_eq!(response.status_code, 200);
//! # });
//! ```

mod delivery;
mod errors;
mod queries;
mod register;
mod registry;
mod types;

pub use delivery::{
    verify_webhook, WebhookRequest, WebhookResponse, HEADER_API_VERSION, HEADER_HMAC,
    HEADER_SHOP_DOMAIN, HEADER_TOPIC, HEADER_WEBHOOK_ID,
};
pub use errors::{InvalidWebhookError, WebhookError};
pub use register::WebhookRegistrar;
pub use registry::WebhookRegistry;
pub use types::{
    handler_fn, split_pub_sub_address, AddressChangeStrategy, DeliveryMethod, FnHandler,
    HandlerError, HandlerFuture, RegisterParams, RegisterResult, RegisterReturn,
    WebhookHandler, WebhookRegistryEntry, WebhookTopic, GDPR_TOPICS,
};
