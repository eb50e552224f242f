//! Inbound webhook validation and dispatch.
//!
//! [`WebhookRegistry::process`] takes the raw body and headers of a delivery,
//! checks them in a fixed order and answers with a [`WebhookResponse`]:
//!
//! | Check                                  | Failure status |
//! |----------------------------------------|----------------|
//! | body is non-empty                      | 400            |
//! | HMAC, topic and shop headers present   | 400            |
//! | signature matches the body             | 401            |
//! | a handler is registered for the topic  | 404            |
//! | the handler succeeds                   | 500            |
//!
//! Signatures are compared in constant time. When the config carries an
//! `old_api_secret_key`, a signature that fails the current key is retried
//! against the old one so deliveries keep working during key rotation.

use std::collections::HashMap;

use crate::auth::hmac::verify_signature_base64;
use crate::config::ShopifyConfig;
use crate::webhooks::errors::InvalidWebhookError;
use crate::webhooks::registry::WebhookRegistry;
use crate::webhooks::types::WebhookTopic;

// ============================================================================
// Header Constants
// ============================================================================

/// Base64 HMAC-SHA256 of the raw body.
pub const HEADER_HMAC: &str = "X-Shopify-Hmac-Sha256";

/// Topic in delivery form, e.g. `orders/create`.
pub const HEADER_TOPIC: &str = "X-Shopify-Topic";

/// The shop's myshopify.com domain.
pub const HEADER_SHOP_DOMAIN: &str = "X-Shopify-Shop-Domain";

/// API version of the payload.
pub const HEADER_API_VERSION: &str = "X-Shopify-API-Version";

/// Unique delivery id, useful for deduplication.
pub const HEADER_WEBHOOK_ID: &str = "X-Shopify-Webhook-Id";

const REQUIRED_HEADERS: [&str; 3] = [HEADER_HMAC, HEADER_TOPIC, HEADER_SHOP_DOMAIN];

// ============================================================================
// WebhookRequest
// ============================================================================

/// A raw inbound delivery.
///
/// The body is kept byte-for-byte since the signature covers the exact
/// payload. Header names are matched case-insensitively.
///
/// ```rust
/// use shopify_admin::webhooks::{WebhookRequest, HEADER_TOPIC};
///
/// let request = WebhookRequest::new(
///     br#"{"id":1}"#.to_vec(),
///     [("x-shopify-topic", "orders/create")],
/// );
/// assert_eq!(request.header(HEADER_TOPIC), Some("orders/create"));
/// assert_eq!(request.topic(), Some("orders/create"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct WebhookRequest {
    body: Vec<u8>,
    headers: HashMap<String, String>,
}

impl WebhookRequest {
    /// Creates a request from the raw body and header pairs.
    pub fn new<I, K, V>(body: impl Into<Vec<u8>>, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.as_ref().to_ascii_lowercase(), value.into()))
            .collect();
        Self {
            body: body.into(),
            headers,
        }
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns a header value by case-insensitive name. Blank values count
    /// as absent.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// `X-Shopify-Hmac-Sha256`.
    #[must_use]
    pub fn hmac(&self) -> Option<&str> {
        self.header(HEADER_HMAC)
    }

    /// `X-Shopify-Topic`.
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.header(HEADER_TOPIC)
    }

    /// `X-Shopify-Shop-Domain`.
    #[must_use]
    pub fn shop_domain(&self) -> Option<&str> {
        self.header(HEADER_SHOP_DOMAIN)
    }

    /// `X-Shopify-API-Version`.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.header(HEADER_API_VERSION)
    }

    /// `X-Shopify-Webhook-Id`.
    #[must_use]
    pub fn webhook_id(&self) -> Option<&str> {
        self.header(HEADER_WEBHOOK_ID)
    }
}

// ============================================================================
// WebhookResponse
// ============================================================================

/// Response the host framework should send for a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Reason phrase for `status_code`.
    pub status_text: String,
    /// Extra response headers. Empty unless the caller adds some.
    pub headers: Vec<(String, String)>,
}

impl WebhookResponse {
    /// Creates a response with the reason phrase for `status_code`.
    #[must_use]
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            status_text: status_text(status_code).to_string(),
            headers: Vec::new(),
        }
    }

    /// `true` for 2xx.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }
}

const fn status_text(status_code: u16) -> &'static str {
    match status_code {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}

// ============================================================================
// Verification
// ============================================================================

/// Checks `hmac` against `body` with the current secret, then the old one.
///
/// ```rust
/// use shopify_admin::{ApiKey, ApiSecretKey, ShopifyConfig};
/// use shopify_admin::auth::hmac::compute_signature_base64;
/// use shopify_admin::webhooks::verify_webhook;
///
/// let config = ShopifyConfig::builder()
///     .api_key(ApiKey::new("key").unwrap())
///     .api_secret_key(ApiSecretKey::new("new-secret").unwrap())
///     .old_api_secret_key(ApiSecretKey::new("old-secret").unwrap())
///     .build()
///     .unwrap();
///
/// let body = b"payload";
/// assert!(verify_webhook(&config, body, &compute_signature_base64(body, "new-secret")));
/// assert!(verify_webhook(&config, body, &compute_signature_base64(body, "old-secret")));
/// assert!(!verify_webhook(&config, body, &compute_signature_base64(body, "other")));
/// ```
#[must_use]
pub fn verify_webhook(config: &ShopifyConfig, body: &[u8], hmac: &str) -> bool {
    if verify_signature_base64(body, config.api_secret_key().as_ref(), hmac) {
        return true;
    }
    config.old_api_secret_key().is_some_and(|old_secret| {
        let verified = verify_signature_base64(body, old_secret.as_ref(), hmac);
        if verified {
            tracing::debug!("Webhook signature matched the previous secret key");
        }
        verified
    })
}

// ============================================================================
// Processing
// ============================================================================

impl WebhookRegistry {
    /// Validates a delivery and runs its handler.
    ///
    /// The handler receives the topic in registry form (`ORDERS_CREATE`),
    /// the shop domain header and the raw body.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWebhookError`] for every non-2xx outcome. Its
    /// `response` field is what the caller should send back.
    pub async fn process(
        &self,
        config: &ShopifyConfig,
        request: &WebhookRequest,
    ) -> Result<WebhookResponse, InvalidWebhookError> {
        if request.body().is_empty() {
            return Err(reject(400, "No body was received when processing webhook"));
        }

        let missing: Vec<&str> = REQUIRED_HEADERS
            .into_iter()
            .filter(|name| request.header(name).is_none())
            .collect();
        let (Some(hmac), Some(topic), Some(shop_domain)) =
            (request.hmac(), request.topic(), request.shop_domain())
        else {
            return Err(reject(
                400,
                format!(
                    "Missing one or more of the required HTTP headers to process webhooks: [{}]",
                    missing.join(", ")
                ),
            ));
        };

        if !verify_webhook(config, request.body(), hmac) {
            return Err(reject(
                401,
                format!("Could not validate request for topic {topic}"),
            ));
        }

        let normalized = WebhookTopic::new(topic);
        let Some(entry) = self.get_handler(normalized.as_str()) else {
            return Err(reject(
                404,
                format!("No webhook is registered for topic {topic}"),
            ));
        };

        if let Err(error) = entry
            .handler
            .handle(normalized.as_str(), shop_domain, request.body())
            .await
        {
            return Err(reject(500, error.to_string()));
        }

        tracing::debug!(
            topic = %normalized,
            shop = shop_domain,
            webhook_id = request.webhook_id().unwrap_or_default(),
            "Processed webhook"
        );
        Ok(WebhookResponse::new(200))
    }
}

fn reject(status_code: u16, message: impl Into<String>) -> InvalidWebhookError {
    let message = message.into();
    let response = WebhookResponse::new(status_code);
    if status_code >= 500 {
        tracing::error!(status = status_code, %message, "Webhook handler failed");
    } else {
        tracing::warn!(status = status_code, %message, "Rejected webhook");
    }
    InvalidWebhookError { message, response }
}
