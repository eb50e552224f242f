//! Admin GraphQL client.
//!
//! [`GraphqlClient`] posts to `/admin/api/{version}/graphql.json` through
//! the shared [`HttpClient`](crate::clients::HttpClient) and surfaces
//! payload-level `errors` as [`GraphqlError::Query`].
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_admin::clients::graphql::{GraphqlClient, GraphqlData};
//! use serde_json::json;
//!
//! let client = GraphqlClient::new(&session, &config)?;
//!
//! let response = client.query("{ shop { name } }", None, None).await?;
//! println!("{}", response.body["data"]["shop"]["name"]);
//!
//! let data = GraphqlData::with_variables(
//!     "query($id: ID!) { product(id: $id) { title } }",
//!     json!({"id": "gid://shopify/Product/1"}),
//! );
//! let response = client.query(data, None, Some(3)).await?;
//! ```

mod client;
mod errors;

pub(crate) use client::credential;
pub use client::{GraphqlClient, GraphqlData, ACCESS_TOKEN_HEADER};
pub use errors::{GraphqlError, GraphqlQueryError};
