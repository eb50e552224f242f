//! GraphQL client implementation.

use serde_json::{json, Value};

use crate::auth::Session;
use crate::clients::graphql::errors::{GraphqlError, GraphqlQueryError};
use crate::clients::{DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::config::{ApiVersion, ShopifyConfig};

/// Header carrying the Admin API credential.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// What to send to the GraphQL endpoint.
///
/// Raw query text goes out as `application/graphql`; a JSON document
/// (usually `{"query": ..., "variables": ...}`) as `application/json`.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphqlData {
    /// Raw GraphQL source.
    Query(String),
    /// Structured request document.
    Json(Value),
}

impl GraphqlData {
    /// Builds a `{"query", "variables"}` document.
    #[must_use]
    pub fn with_variables(query: impl Into<String>, variables: Value) -> Self {
        Self::Json(json!({ "query": query.into(), "variables": variables }))
    }

    /// `true` for blank text, `null`, an empty string or an empty object.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Query(query) => query.trim().is_empty(),
            Self::Json(Value::Null) => true,
            Self::Json(Value::String(query)) => query.trim().is_empty(),
            Self::Json(Value::Object(fields)) => fields.is_empty(),
            Self::Json(_) => false,
        }
    }

    fn into_body(self) -> (Value, DataType) {
        match self {
            Self::Query(query) => (Value::String(query), DataType::GraphQL),
            Self::Json(document) => (document, DataType::Json),
        }
    }
}

impl From<&str> for GraphqlData {
    fn from(query: &str) -> Self {
        Self::Query(query.to_string())
    }
}

impl From<String> for GraphqlData {
    fn from(query: String) -> Self {
        Self::Query(query)
    }
}

impl From<Value> for GraphqlData {
    fn from(document: Value) -> Self {
        Self::Json(document)
    }
}

/// Value for [`ACCESS_TOKEN_HEADER`]: the app secret for private apps,
/// otherwise the session's token.
pub(crate) fn credential(session: &Session, config: &ShopifyConfig) -> Option<String> {
    if config.is_private_app() {
        Some(config.api_secret_key().as_ref().to_string())
    } else {
        session.access_token().map(String::from)
    }
}

/// Admin GraphQL client for one session.
///
/// The credential header is the session's access token, or the app's
/// secret key in private app mode.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http_client: HttpClient,
    api_version: ApiVersion,
    access_token: String,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a client using the configured API version.
    ///
    /// # Errors
    ///
    /// [`GraphqlError::MissingAccessToken`] when the app is not private and
    /// the session has no token; [`GraphqlError::Http`] if the transport
    /// cannot be built.
    pub fn new(session: &Session, config: &ShopifyConfig) -> Result<Self, GraphqlError> {
        Self::create(session, config, config.api_version().clone())
    }

    /// Creates a client pinned to `version` instead of the configured one.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_version(
        session: &Session,
        config: &ShopifyConfig,
        version: ApiVersion,
    ) -> Result<Self, GraphqlError> {
        if &version == config.api_version() {
            tracing::debug!(
                "GraphQL client has a redundant API version override to the default {}",
                version
            );
        } else {
            tracing::debug!(
                "GraphQL client overriding default API version {} with {}",
                config.api_version(),
                version
            );
        }
        Self::create(session, config, version)
    }

    fn create(
        session: &Session,
        config: &ShopifyConfig,
        api_version: ApiVersion,
    ) -> Result<Self, GraphqlError> {
        let access_token = credential(session, config).ok_or(GraphqlError::MissingAccessToken)?;

        Ok(Self {
            http_client: HttpClient::new(&session.shop, Some(config))?,
            api_version,
            access_token,
        })
    }

    /// Returns the version used for requests.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the endpoint path for `version`.
    #[must_use]
    pub fn endpoint(version: &ApiVersion) -> String {
        format!("/admin/api/{version}/graphql.json")
    }

    /// Runs a query or mutation against this client's version.
    ///
    /// `headers` are applied after the credential header and may override
    /// it. `tries` is the transport attempt budget (default 1).
    ///
    /// # Errors
    ///
    /// - [`GraphqlError::MissingQuery`] before any I/O when `data` is empty
    /// - [`GraphqlError::Http`] on transport failure
    /// - [`GraphqlError::Query`] when the body contains `errors`
    pub async fn query(
        &self,
        data: impl Into<GraphqlData>,
        headers: Option<&[(&str, &str)]>,
        tries: Option<u32>,
    ) -> Result<HttpResponse, GraphqlError> {
        self.query_with_version(&self.api_version, data, headers, tries)
            .await
    }

    /// Same as [`query`](Self::query), against an explicit API version.
    ///
    /// # Errors
    ///
    /// Same as [`query`](Self::query).
    pub async fn query_with_version(
        &self,
        version: &ApiVersion,
        data: impl Into<GraphqlData>,
        headers: Option<&[(&str, &str)]>,
        tries: Option<u32>,
    ) -> Result<HttpResponse, GraphqlError> {
        let data = data.into();
        if data.is_empty() {
            return Err(GraphqlError::MissingQuery);
        }
        let (body, body_type) = data.into_body();

        let request = HttpRequest::builder(HttpMethod::Post, Self::endpoint(version))
            .body(body)
            .body_type(body_type)
            .header(ACCESS_TOKEN_HEADER, self.access_token.as_str())
            .headers(headers.unwrap_or_default().iter().copied())
            .tries(tries.unwrap_or(1))
            .build()
            .map_err(HttpError::from)?;

        let response = self.http_client.request(request).await?;

        if response.body.get("errors").is_some() {
            return Err(GraphqlQueryError {
                message: "GraphQL query returned errors".to_string(),
                response: response.body,
            }
            .into());
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, ApiSecretKey, ShopDomain};

    fn config(private: bool) -> ShopifyConfig {
        ShopifyConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .api_version(ApiVersion::V2025_07)
            .is_private_app(private)
            .build()
            .unwrap()
    }

    fn session(token: Option<&str>) -> Session {
        Session::new(
            "id".to_string(),
            ShopDomain::new("shop").unwrap(),
            token.map(String::from),
            false,
            None,
        )
    }

    #[test]
    fn test_public_app_requires_token() {
        let result = GraphqlClient::new(&session(None), &config(false));
        assert!(matches!(result, Err(GraphqlError::MissingAccessToken)));
    }

    #[test]
    fn test_private_app_uses_secret() {
        let client = GraphqlClient::new(&session(None), &config(true)).unwrap();
        assert_eq!(client.access_token, "secret");
    }

    #[test]
    fn test_version_override() {
        let client =
            GraphqlClient::with_version(&session(Some("t")), &config(false), ApiVersion::Unstable)
                .unwrap();
        assert_eq!(client.api_version(), &ApiVersion::Unstable);
        assert_eq!(
            GraphqlClient::endpoint(client.api_version()),
            "/admin/api/unstable/graphql.json"
        );
    }

    #[test]
    fn test_data_emptiness() {
        assert!(GraphqlData::from("").is_empty());
        assert!(GraphqlData::from("   ").is_empty());
        assert!(GraphqlData::from(json!({})).is_empty());
        assert!(GraphqlData::from(Value::Null).is_empty());
        assert!(!GraphqlData::from("{ shop { id } }").is_empty());
        assert!(!GraphqlData::with_variables("{ shop { id } }", json!({})).is_empty());
    }

    #[test]
    fn test_data_content_type() {
        assert_eq!(GraphqlData::from("{ shop { id } }").into_body().1, DataType::GraphQL);
        assert_eq!(
            GraphqlData::from(json!({"query": "{ shop { id } }"})).into_body().1,
            DataType::Json
        );
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_io() {
        let client = GraphqlClient::new(&session(Some("t")), &config(false)).unwrap();
        let result = client.query("", None, None).await;
        assert!(matches!(result, Err(GraphqlError::MissingQuery)));
    }
}
