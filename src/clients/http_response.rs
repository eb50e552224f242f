//! Parsed Admin API responses.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

/// Usage of the REST leaky bucket, from `X-Shopify-Shop-Api-Call-Limit: 32/40`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiCallLimit {
    /// Requests currently counted against the bucket.
    pub request_count: u32,
    /// Bucket capacity.
    pub bucket_size: u32,
}

impl ApiCallLimit {
    /// Parses an `X/Y` header value.
    #[must_use]
    pub fn parse(header_value: &str) -> Option<Self> {
        let (count, size) = header_value.trim().split_once('/')?;
        Some(Self {
            request_count: count.trim().parse().ok()?,
            bucket_size: size.trim().parse().ok()?,
        })
    }
}

/// Cursor tokens taken from a REST `Link` header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaginationInfo {
    /// `page_info` of the `rel="previous"` link.
    pub prev_page_info: Option<String>,
    /// `page_info` of the `rel="next"` link.
    pub next_page_info: Option<String>,
}

impl PaginationInfo {
    /// Parses `<url>; rel="next", <url>; rel="previous"`.
    ///
    /// ```rust
    /// use shopify_admin::clients::PaginationInfo;
    ///
    /// let info = PaginationInfo::parse_link_header(
    ///     r#"<https://s.myshopify.com/admin/api/2025-10/products.json?limit=5&page_info=abc>; rel="next""#,
    /// );
    /// assert_eq!(info.next_page_info.as_deref(), Some("abc"));
    /// assert_eq!(info.prev_page_info, None);
    /// ```
    #[must_use]
    pub fn parse_link_header(header_value: &str) -> Self {
        let mut info = Self::default();

        for link in header_value.split(',') {
            let mut parts = link.split(';').map(str::trim);
            let Some(url) = parts.next() else { continue };
            let url = url.trim_start_matches('<').trim_end_matches('>');
            let rel = parts
                .filter_map(|part| part.strip_prefix("rel="))
                .map(|rel| rel.trim_matches('"'))
                .next();

            let page_info = url
                .split_once('?')
                .map(|(_, query)| query)
                .and_then(|query| {
                    query
                        .split('&')
                        .filter_map(|pair| pair.split_once('='))
                        .find(|(key, _)| *key == "page_info")
                        .map(|(_, value)| value.to_string())
                });

            match (rel, page_info) {
                (Some("next"), Some(token)) => info.next_page_info = Some(token),
                (Some("previous"), Some(token)) => info.prev_page_info = Some(token),
                _ => {}
            }
        }

        info
    }
}

/// A response received from the Admin API.
///
/// Header names are lower-cased; a header may carry several values. An
/// empty body parses as `{}`.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub code: u16,
    /// Canonical reason phrase for `code`, e.g. `Not Found`.
    pub status_text: String,
    /// Lower-cased header map.
    pub headers: HashMap<String, Vec<String>>,
    /// Parsed JSON body.
    pub body: Value,
    /// Cursor links from the `Link` header.
    pub page_info: PaginationInfo,
    /// REST bucket usage.
    pub api_call_limit: Option<ApiCallLimit>,
    /// Server-requested wait before the next attempt.
    pub retry_after: Option<Duration>,
}

impl HttpResponse {
    /// Builds a response, parsing the Shopify-specific headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Value) -> Self {
        let first = |name: &str| headers.get(name).and_then(|values| values.first());

        let page_info = first("link")
            .map(|link| PaginationInfo::parse_link_header(link))
            .unwrap_or_default();
        let api_call_limit =
            first("x-shopify-shop-api-call-limit").and_then(|v| ApiCallLimit::parse(v));
        let retry_after = first("retry-after").and_then(|v| parse_retry_after(v));
        let status_text = reqwest::StatusCode::from_u16(code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or_default()
            .to_string();

        Self {
            code,
            status_text,
            headers,
            body,
            page_info,
            api_call_limit,
            retry_after,
        }
    }

    /// `true` for 2xx.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// `true` for statuses the transport retries: 429 and every 5xx.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        self.code == 429 || self.code >= 500
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// `X-Request-Id`, quoted back to Shopify support when reporting errors.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// `X-Shopify-API-Deprecated-Reason`, present when the call used a
    /// deprecated endpoint or field.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-shopify-api-deprecated-reason")
    }
}

fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds = value.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_headers(code: u16, pairs: &[(&str, &str)]) -> HttpResponse {
        let mut headers: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in pairs {
            headers
                .entry((*name).to_string())
                .or_default()
                .push((*value).to_string());
        }
        HttpResponse::new(code, headers, json!({}))
    }

    #[test]
    fn test_status_classification() {
        assert!(with_headers(200, &[]).is_ok());
        assert!(with_headers(204, &[]).is_ok());
        assert!(!with_headers(302, &[]).is_ok());

        assert!(with_headers(429, &[]).is_retriable());
        assert!(with_headers(500, &[]).is_retriable());
        assert!(with_headers(503, &[]).is_retriable());
        assert!(!with_headers(403, &[]).is_retriable());
        assert!(!with_headers(404, &[]).is_retriable());
    }

    #[test]
    fn test_status_text() {
        assert_eq!(with_headers(404, &[]).status_text, "Not Found");
        assert_eq!(with_headers(429, &[]).status_text, "Too Many Requests");
    }

    #[test]
    fn test_fractional_retry_after() {
        let response = with_headers(429, &[("retry-after", "0.05")]);
        assert_eq!(response.retry_after, Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_invalid_retry_after_is_ignored() {
        assert_eq!(with_headers(429, &[("retry-after", "soon")]).retry_after, None);
        assert_eq!(with_headers(429, &[("retry-after", "-1")]).retry_after, None);
    }

    #[test]
    fn test_call_limit_and_request_id() {
        let response = with_headers(
            200,
            &[
                ("x-shopify-shop-api-call-limit", "32/40"),
                ("x-request-id", "req-123"),
            ],
        );
        assert_eq!(
            response.api_call_limit,
            Some(ApiCallLimit {
                request_count: 32,
                bucket_size: 40
            })
        );
        assert_eq!(response.request_id(), Some("req-123"));
        assert_eq!(response.header("X-Request-ID"), Some("req-123"));
    }

    #[test]
    fn test_link_header_both_directions() {
        let response = with_headers(
            200,
            &[(
                "link",
                r#"<https://s.myshopify.com/a.json?page_info=p1>; rel="previous", <https://s.myshopify.com/a.json?limit=1&page_info=n1>; rel="next""#,
            )],
        );
        assert_eq!(response.page_info.prev_page_info.as_deref(), Some("p1"));
        assert_eq!(response.page_info.next_page_info.as_deref(), Some("n1"));
    }

    #[test]
    fn test_deprecation_reason() {
        let response = with_headers(
            200,
            &[("x-shopify-api-deprecated-reason", "https://shopify.dev/changelog")],
        );
        assert_eq!(
            response.deprecation_reason(),
            Some("https://shopify.dev/changelog")
        );
    }
}
