//! Webhook error types.
//!
//! - [`WebhookError`]: failures that abort a registration call
//! - [`InvalidWebhookError`]: a rejected inbound delivery, carrying the
//!   response the host framework should send back

use crate::clients::GraphqlError;
use crate::webhooks::delivery::WebhookResponse;
use thiserror::Error;

/// Errors that abort webhook registration.
///
/// Per-topic outcomes, including GraphQL payload errors, are reported in
/// [`RegisterReturn`](crate::webhooks::RegisterReturn) instead.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// HTTP delivery needs the app's public URL.
    #[error("Host URL is not configured. Please set host in ShopifyConfig to register webhooks.")]
    HostNotConfigured,

    /// Transport or client construction failure.
    #[error(transparent)]
    Graphql(#[from] GraphqlError),

    /// A mutation returned `userErrors`.
    #[error("Shopify API error: {message}")]
    ShopifyError {
        /// Joined `userErrors` messages.
        message: String,
    },
}

/// A delivery that failed validation or handling.
///
/// The message says why; `response` holds the status to answer with.
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct InvalidWebhookError {
    /// Human-readable reason.
    pub message: String,
    /// Response for the inbound request.
    pub response: WebhookResponse,
}
