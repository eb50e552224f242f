//! # Shopify Admin SDK
//!
//! Server-side client for the Shopify Admin API: versioned REST and GraphQL
//! requests with retry and backoff, webhook subscription management, and
//! verification and dispatch of inbound webhook deliveries.
//!
//! ## Overview
//!
//! - [`ShopifyConfig`]: credentials, API version, app host, retry timing
//! - [`Session`]: the shop and access token requests are made for
//! - [`HttpClient`]: transport with retry on 429 and 5xx
//! - [`GraphqlClient`]: Admin GraphQL endpoint
//! - [`rest::RestExecutor`]: generic executor for REST resource descriptors
//! - [`webhooks`]: handler registry, subscription reconciliation and
//!   delivery processing
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_admin::{ApiKey, ApiSecretKey, ApiVersion, HostUrl, Session, ShopDomain, ShopifyConfig};
//!
//! let config = ShopifyConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-api-secret").unwrap())
//!     .host(HostUrl::new("https://your-app.example.com").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//!
//! let session = Session::offline(ShopDomain::new("my-store").unwrap(), "shpat_token");
//! assert_eq!(session.shop.as_ref(), "my-store.myshopify.com");
//! ```
//!
//! ## GraphQL
//!
//! ```rust,ignore
//! use shopify_admin::GraphqlClient;
//!
//! let client = GraphqlClient::new(&session, &config)?;
//! let response = client.query("{ shop { name } }", None, Some(3)).await?;
//! println!("{}", response.body["data"]["shop"]["name"]);
//! ```
//!
//! ## Webhooks
//!
//! ```rust,ignore
//! use shopify_admin::webhooks::{handler_fn, WebhookRegistrar, WebhookRegistry, WebhookRegistryEntry};
//!
//! let mut registry = WebhookRegistry::new();
//! registry.add_handler(
//!     "orders/create",
//!     WebhookRegistryEntry::http("/webhooks", handler_fn(|topic, shop, body| {
//!         println!("{topic} from {shop}: {} bytes", body.len());
//!         Ok(())
//!     })),
//! );
//!
//! // Sync subscriptions for a shop.
//! let results = WebhookRegistrar::new(&config).register_all(&session, &registry).await?;
//!
//! // In the HTTP handler for /webhooks:
//! match registry.process(&config, &request).await {
//!     Ok(response) => reply(response.status_code),
//!     Err(rejected) => reply(rejected.response.status_code),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (retries, deprecation notices,
//! subscription changes, rejected deliveries) and never installs a
//! subscriber.

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;
pub mod webhooks;

pub use auth::Session;
pub use config::{
    ApiKey, ApiSecretKey, ApiVersion, HostUrl, ShopDomain, ShopifyConfig, ShopifyConfigBuilder,
};
pub use error::ConfigError;

pub use clients::{
    ApiCallLimit, DataType, GraphqlClient, GraphqlData, GraphqlError, GraphqlQueryError,
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError, PaginationInfo,
};

pub use webhooks::{
    InvalidWebhookError, WebhookError, WebhookRegistrar, WebhookRegistry, WebhookRegistryEntry,
};
