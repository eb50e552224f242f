//! Transport error types.
//!
//! Every failed [`HttpClient::request`](crate::clients::HttpClient::request)
//! resolves to one [`HttpError`] variant:
//!
//! | Variant | Cause |
//! |---------|-------|
//! | `InvalidRequest` | rejected before any I/O |
//! | `Request` | no response received |
//! | `Response` | non-retriable status (403, 404, ...) |
//! | `Throttling` | 429 with a single-attempt budget |
//! | `InternalServer` | 5xx with a single-attempt budget |
//! | `MaxRetries` | retriable statuses until the budget ran out |
//!
//! ```rust,ignore
//! match client.request(request).await {
//!     Ok(response) => println!("{}", response.body),
//!     Err(HttpError::Throttling { retry_after, .. }) => back_off(retry_after),
//!     Err(HttpError::MaxRetries(e)) => eprintln!("gave up after {} tries", e.tries),
//!     Err(other) => return Err(other.into()),
//! }
//! ```

use std::time::Duration;

use thiserror::Error;

/// A non-2xx response.
///
/// `message` is a JSON document holding the response's `errors`, `error`
/// and `error_description` fields plus an `error_reference` line naming
/// the request id.
#[derive(Debug, Error, Clone)]
#[error("Received an error response with status {code} ({status_text}): {message}")]
pub struct HttpResponseError {
    /// HTTP status code.
    pub code: u16,
    /// Canonical reason phrase.
    pub status_text: String,
    /// Serialized error details.
    pub message: String,
    /// `X-Request-Id` of the failed response.
    pub error_reference: Option<String>,
}

/// The attempt budget was used up on retriable responses.
#[derive(Debug, Error, Clone)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// Status of the last response.
    pub code: u16,
    /// Attempts made.
    pub tries: u32,
    /// Serialized error details of the last response.
    pub message: String,
    /// `X-Request-Id` of the last response.
    pub error_reference: Option<String>,
}

/// A request rejected before it was sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A body was given without a [`DataType`](crate::clients::DataType).
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// POST and PUT need a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The offending method.
        method: String,
    },

    /// The attempt count was negative.
    #[error("Number of tries must be >= 0, got {tries}.")]
    InvalidTries {
        /// The rejected value.
        tries: i64,
    },
}

/// Any failure of the transport layer.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request validation failed; nothing was sent.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// No response was received.
    #[error("Failed to make request: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-retriable error status.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// 429 on a request that allowed a single attempt.
    #[error("Shopify is throttling requests: {error}")]
    Throttling {
        /// The 429 response.
        error: HttpResponseError,
        /// The server's `Retry-After`, if it sent one.
        retry_after: Option<Duration>,
    },

    /// 5xx on a request that allowed a single attempt.
    #[error("Shopify internal error: {0}")]
    InternalServer(HttpResponseError),

    /// Retriable failures exhausted the attempt budget.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),
}

impl HttpError {
    /// Status code of the response behind this error, if there was one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response(error)
            | Self::InternalServer(error)
            | Self::Throttling { error, .. } => Some(error.code),
            Self::MaxRetries(error) => Some(error.code),
            Self::InvalidRequest(_) | Self::Request(_) => None,
        }
    }
}
