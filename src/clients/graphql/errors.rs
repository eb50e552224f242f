//! GraphQL client errors.
//!
//! GraphQL reports most failures inside a 200 response. The client turns a
//! top-level `errors` array into [`GraphqlError::Query`], so a successful
//! return always means the payload had no query-level errors.

use crate::clients::HttpError;
use serde_json::Value;
use thiserror::Error;

/// The server answered 2xx but the payload carried `errors`.
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct GraphqlQueryError {
    /// Summary line.
    pub message: String,
    /// Full response body, including `errors` and any partial `data`.
    pub response: Value,
}

impl GraphqlQueryError {
    /// Returns the `errors` array from the response.
    #[must_use]
    pub fn errors(&self) -> Option<&Value> {
        self.response.get("errors")
    }
}

/// Failures of [`GraphqlClient`](super::GraphqlClient).
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// Transport failure.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Payload-level GraphQL errors.
    #[error(transparent)]
    Query(#[from] GraphqlQueryError),

    /// `query` was called with nothing to send.
    #[error("Query missing.")]
    MissingQuery,

    /// A public app session has no access token.
    #[error("Missing access token when creating GraphQL client")]
    MissingAccessToken,
}
