//! Admin API clients.
//!
//! - [`HttpClient`]: shop-scoped transport with retry and backoff
//! - [`graphql::GraphqlClient`]: GraphQL endpoint wrapper over the transport
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_admin::clients::{DataType, HttpClient, HttpMethod, HttpRequest};
//! use serde_json::json;
//!
//! let client = HttpClient::new(&shop, Some(&config))?;
//! let request = HttpRequest::builder(HttpMethod::Post, "/admin/api/2025-10/graphql.json")
//!     .body(json!({"query": "{ shop { name } }"}))
//!     .body_type(DataType::Json)
//!     .header("X-Shopify-Access-Token", token)
//!     .tries(3)
//!     .build()?;
//! let response = client.request(request).await?;
//! ```

mod errors;
pub mod graphql;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{ApiCallLimit, HttpResponse, PaginationInfo};

pub use graphql::{GraphqlClient, GraphqlData, GraphqlError, GraphqlQueryError};
