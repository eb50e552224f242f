//! Shop-scoped HTTP transport with bounded retries.
//!
//! [`HttpClient`] owns the connection pool for one shop. Each call to
//! [`HttpClient::request`] runs a small state machine:
//!
//! - 2xx returns immediately.
//! - 429 and 5xx are retried while the request's attempt budget lasts,
//!   waiting for the server's `Retry-After` when present and the configured
//!   retry wait otherwise.
//! - Any other status, or a failure to get a response at all, is returned
//!   without retrying.

use std::time::Duration;

use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{ShopDomain, ShopifyConfig, DEFAULT_RETRY_WAIT_TIME};

/// Crate version, reported in the `User-Agent`.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client bound to one shop's Admin API origin.
///
/// Requests carry absolute paths; the client prefixes them with
/// `https://{shop}` or, when [`ShopifyConfig::api_host`] is set, with that
/// origin instead.
///
/// ```rust,ignore
/// use shopify_admin::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::new(&session.shop, Some(&config))?;
/// let request = HttpRequest::builder(HttpMethod::Get, "/admin/api/2025-10/shop.json")
///     .header("X-Shopify-Access-Token", token)
///     .tries(3)
///     .build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_uri: String,
    default_headers: Vec<(String, String)>,
    retry_wait_time: Duration,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client for `shop`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Request`] if the TLS backend cannot be
    /// initialised.
    pub fn new(shop: &ShopDomain, config: Option<&ShopifyConfig>) -> Result<Self, HttpError> {
        let base_uri = config
            .and_then(ShopifyConfig::api_host)
            .map_or_else(|| format!("https://{shop}"), |host| host.origin());

        let prefix = config
            .and_then(ShopifyConfig::user_agent_prefix)
            .map_or_else(String::new, |prefix| format!("{prefix} | "));
        let user_agent = format!(
            "{prefix}Shopify Admin SDK v{SDK_VERSION} | Rust {}",
            env!("CARGO_PKG_RUST_VERSION")
        );

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            base_uri,
            default_headers: vec![
                ("User-Agent".to_string(), user_agent),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            retry_wait_time: config.map_or(DEFAULT_RETRY_WAIT_TIME, ShopifyConfig::retry_wait_time),
        })
    }

    /// Overrides the wait used between retries without `Retry-After`.
    #[must_use]
    pub const fn with_retry_wait_time(mut self, wait: Duration) -> Self {
        self.retry_wait_time = wait;
        self
    }

    /// Returns the origin requests are sent to.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    /// Sends `request`, retrying 429 and 5xx responses within its budget.
    ///
    /// # Errors
    ///
    /// See [`HttpError`] for how each failure class is reported.
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = format!("{}{}", self.base_uri, request.path);
        let headers = self.merge_headers(&request);
        let body = request.encoded_body();

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let response = self.send(&url, &request, &headers, body.as_deref()).await?;

            if let Some(reason) = response.deprecation_reason() {
                tracing::warn!(
                    path = %request.path,
                    reason,
                    "Deprecated request to Shopify API"
                );
            }

            if response.is_ok() {
                return Ok(response);
            }

            let error = response_error(&response);
            if !response.is_retriable() {
                return Err(HttpError::Response(error));
            }

            if tries >= request.tries {
                return Err(exhausted(&response, error, request.tries));
            }

            let delay = response.retry_after.unwrap_or(self.retry_wait_time);
            tracing::debug!(
                path = %request.path,
                status = response.code,
                attempt = tries,
                max_tries = request.tries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Retrying Shopify API request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn send(
        &self,
        url: &str,
        request: &HttpRequest,
        headers: &[(String, String)],
        body: Option<&str>,
    ) -> Result<HttpResponse, HttpError> {
        let mut builder = match request.http_method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let res = builder.send().await?;

        let code = res.status().as_u16();
        let mut res_headers = std::collections::HashMap::<String, Vec<String>>::new();
        for (name, value) in res.headers() {
            res_headers
                .entry(name.as_str().to_ascii_lowercase())
                .or_default()
                .push(value.to_str().unwrap_or_default().to_string());
        }
        let text = res.text().await.unwrap_or_default();
        let body = parse_body(code, &text);

        Ok(HttpResponse::new(code, res_headers, body))
    }

    /// Defaults, then `Content-Type`, then caller headers. Names compare
    /// case-insensitively. A caller `User-Agent` is prefixed to the default.
    fn merge_headers(&self, request: &HttpRequest) -> Vec<(String, String)> {
        let mut headers = self.default_headers.clone();
        if let Some(body_type) = request.body_type {
            set_header(&mut headers, "Content-Type", body_type.as_content_type());
        }

        for (name, value) in &request.extra_headers {
            if name.eq_ignore_ascii_case("user-agent") {
                let combined = headers
                    .iter()
                    .find(|(n, _)| n.eq_ignore_ascii_case("user-agent"))
                    .map_or_else(|| value.clone(), |(_, default)| format!("{value} | {default}"));
                set_header(&mut headers, "User-Agent", &combined);
            } else {
                set_header(&mut headers, name, value);
            }
        }
        headers
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

fn parse_body(code: u16, text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| {
        if code >= 500 {
            serde_json::json!({ "raw_body": text })
        } else {
            serde_json::json!({})
        }
    })
}

fn exhausted(response: &HttpResponse, error: HttpResponseError, tries: u32) -> HttpError {
    if tries > 1 {
        return HttpError::MaxRetries(MaxHttpRetriesExceededError {
            code: error.code,
            tries,
            message: error.message,
            error_reference: error.error_reference,
        });
    }
    if response.code == 429 {
        HttpError::Throttling {
            error,
            retry_after: response.retry_after,
        }
    } else {
        HttpError::InternalServer(error)
    }
}

fn response_error(response: &HttpResponse) -> HttpResponseError {
    HttpResponseError {
        code: response.code,
        status_text: response.status_text.clone(),
        message: serialize_error(response),
        error_reference: response.request_id().map(String::from),
    }
}

fn serialize_error(response: &HttpResponse) -> String {
    let mut details = serde_json::Map::new();

    for field in ["errors", "error"] {
        if let Some(value) = response.body.get(field) {
            details.insert(field.to_string(), value.clone());
        }
    }
    if details.contains_key("error") {
        if let Some(description) = response.body.get("error_description") {
            details.insert("error_description".to_string(), description.clone());
        }
    }
    if let Some(request_id) = response.request_id() {
        details.insert(
            "error_reference".to_string(),
            serde_json::Value::String(format!(
                "If you report this error, please include this id: {request_id}."
            )),
        );
    }

    serde_json::Value::Object(details).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::http_request::DataType;
    use crate::config::{ApiKey, ApiSecretKey, HostUrl};
    use serde_json::json;
    use std::collections::HashMap;

    fn shop() -> ShopDomain {
        ShopDomain::new("test-shop").unwrap()
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_base_uri_defaults_to_shop() {
        let client = HttpClient::new(&shop(), None).unwrap();
        assert_eq!(client.base_uri(), "https://test-shop.myshopify.com");
    }

    #[test]
    fn test_api_host_overrides_origin() {
        let config = ShopifyConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .api_host(HostUrl::new("http://127.0.0.1:4010/ignored").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(&shop(), Some(&config)).unwrap();
        assert_eq!(client.base_uri(), "http://127.0.0.1:4010");
    }

    #[test]
    fn test_user_agent_with_config_prefix() {
        let config = ShopifyConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&shop(), Some(&config)).unwrap();

        let user_agent = header(client.default_headers(), "user-agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | Shopify Admin SDK v"));
        assert!(user_agent.contains("| Rust "));
    }

    #[test]
    fn test_merge_headers_is_case_insensitive() {
        let client = HttpClient::new(&shop(), None).unwrap();
        let request = HttpRequest::builder(HttpMethod::Post, "/admin/api/2025-10/graphql.json")
            .body("{ shop { name } }")
            .body_type(DataType::GraphQL)
            .header("accept", "text/plain")
            .header("user-agent", "My agent")
            .build()
            .unwrap();

        let headers = client.merge_headers(&request);
        assert_eq!(header(&headers, "Accept"), Some("text/plain"));
        assert_eq!(header(&headers, "Content-Type"), Some("application/graphql"));
        assert!(header(&headers, "User-Agent")
            .unwrap()
            .starts_with("My agent | Shopify Admin SDK v"));
        assert_eq!(
            headers
                .iter()
                .filter(|(n, _)| n.eq_ignore_ascii_case("accept"))
                .count(),
            1
        );
    }

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(200, ""), json!({}));
        assert_eq!(parse_body(200, r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(parse_body(404, "<html>"), json!({}));
        assert_eq!(parse_body(502, "<html>"), json!({"raw_body": "<html>"}));
    }

    #[test]
    fn test_serialize_error_fields() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["abc".to_string()]);
        let response = HttpResponse::new(
            400,
            headers,
            json!({"error": "bad", "error_description": "very bad", "ignored": 1}),
        );

        let value: serde_json::Value = serde_json::from_str(&serialize_error(&response)).unwrap();
        assert_eq!(value["error"], "bad");
        assert_eq!(value["error_description"], "very bad");
        assert!(value.get("ignored").is_none());
        assert_eq!(
            value["error_reference"],
            "If you report this error, please include this id: abc."
        );
    }

    #[test]
    fn test_exhausted_classification() {
        let throttled = HttpResponse::new(429, HashMap::new(), json!({}));
        let single = exhausted(&throttled, response_error(&throttled), 1);
        assert!(matches!(single, HttpError::Throttling { .. }));

        let failing = HttpResponse::new(503, HashMap::new(), json!({}));
        let single = exhausted(&failing, response_error(&failing), 1);
        assert!(matches!(single, HttpError::InternalServer(ref e) if e.code == 503));

        let multi = exhausted(&failing, response_error(&failing), 3);
        assert!(matches!(multi, HttpError::MaxRetries(ref e) if e.tries == 3 && e.code == 503));
    }
}
