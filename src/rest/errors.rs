//! Errors from the REST resource executor.

use crate::clients::HttpError;
use thiserror::Error;

/// Failures of [`RestExecutor`](super::RestExecutor).
///
/// ```rust
/// use shopify_admin::rest::RestError;
///
/// let error = RestError::NotFound { resource: "product", id: "632910392".to_string() };
/// assert_eq!(error.to_string(), "product with id 632910392 not found");
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// A public app session has no access token.
    #[error("Missing access token when creating REST executor")]
    MissingAccessToken,

    /// None of the resource's paths can be built from the given ids.
    #[error("Cannot resolve path for {resource}::{operation} with provided IDs")]
    PathResolutionFailed {
        /// Resource key, e.g. `product`.
        resource: &'static str,
        /// Operation name, e.g. `find`.
        operation: &'static str,
    },

    /// The server answered 404 for a request that named an id.
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Resource key.
        resource: &'static str,
        /// The requested `id`.
        id: String,
    },

    /// The body did not match the resource type.
    #[error("Failed to deserialize '{key}': {source}")]
    Deserialize {
        /// Body key that was read.
        key: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Transport failure or any other non-2xx status.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl RestError {
    /// `X-Request-Id` of the failed call, when the transport captured it.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Http(HttpError::Response(error) | HttpError::InternalServer(error)) => {
                error.error_reference.as_deref()
            }
            Self::Http(HttpError::Throttling { error, .. }) => error.error_reference.as_deref(),
            Self::Http(HttpError::MaxRetries(error)) => error.error_reference.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;

    #[test]
    fn test_path_resolution_message() {
        let error = RestError::PathResolutionFailed {
            resource: "variant",
            operation: "all",
        };
        assert_eq!(
            error.to_string(),
            "Cannot resolve path for variant::all with provided IDs"
        );
    }

    #[test]
    fn test_request_id_from_http_error() {
        let error = RestError::Http(HttpError::Response(HttpResponseError {
            code: 422,
            status_text: "Unprocessable Entity".to_string(),
            message: r#"{"errors":{"title":["can't be blank"]}}"#.to_string(),
            error_reference: Some("req-1".to_string()),
        }));
        assert_eq!(error.request_id(), Some("req-1"));
        assert_eq!(RestError::MissingAccessToken.request_id(), None);
    }
}
