//! Typed wrapper around REST responses.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::{ApiCallLimit, HttpResponse, PaginationInfo};
use crate::rest::errors::RestError;

/// Resources decoded from a REST response, plus the response metadata.
///
/// Derefs to the decoded resources. A single-resource response (`{"product":
/// {...}}`) yields one item, a collection (`{"products": [...]}`) yields all
/// of them, and anything else (delete, count) yields none; the raw body
/// stays available through [`body`](Self::body).
///
/// ```rust
/// use shopify_admin::rest::RestResponse;
/// use serde_json::json;
///
/// let response: RestResponse<serde_json::Value> = RestResponse::new(
///     vec![json!({"id": 1})],
///     json!({"product": {"id": 1}}),
/// );
/// assert_eq!(response.len(), 1);
/// assert_eq!(response.first().unwrap()["id"], 1);
/// assert!(!response.has_next_page());
/// ```
#[derive(Debug, Clone)]
pub struct RestResponse<T> {
    data: Vec<T>,
    body: Value,
    page_info: PaginationInfo,
    api_call_limit: Option<ApiCallLimit>,
    request_id: Option<String>,
}

impl<T> RestResponse<T> {
    /// Wraps already decoded resources with no metadata.
    #[must_use]
    pub fn new(data: Vec<T>, body: Value) -> Self {
        Self {
            data,
            body,
            page_info: PaginationInfo::default(),
            api_call_limit: None,
            request_id: None,
        }
    }

    /// Consumes the response, returning the resources.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.data
    }

    /// Raw JSON body.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// The `count` field of a count response.
    #[must_use]
    pub fn count(&self) -> Option<u64> {
        self.body.get("count").and_then(Value::as_u64)
    }

    /// Cursor for the next page, from the `Link` header.
    #[must_use]
    pub fn next_page_info(&self) -> Option<&str> {
        self.page_info.next_page_info.as_deref()
    }

    /// Cursor for the previous page.
    #[must_use]
    pub fn prev_page_info(&self) -> Option<&str> {
        self.page_info.prev_page_info.as_deref()
    }

    /// `true` when a next page exists.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.page_info.next_page_info.is_some()
    }

    /// `true` when a previous page exists.
    #[must_use]
    pub const fn has_prev_page(&self) -> bool {
        self.page_info.prev_page_info.is_some()
    }

    /// Bucket usage reported with the response.
    #[must_use]
    pub const fn api_call_limit(&self) -> Option<ApiCallLimit> {
        self.api_call_limit
    }

    /// `X-Request-Id` of the response.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl<T: DeserializeOwned> RestResponse<T> {
    /// Decodes `response` using the resource's singular and plural keys.
    ///
    /// # Errors
    ///
    /// [`RestError::Deserialize`] when the value under either key does not
    /// match `T`.
    pub fn from_http_response(
        response: HttpResponse,
        singular: &'static str,
        plural: &'static str,
    ) -> Result<Self, RestError> {
        let request_id = response.request_id().map(String::from);
        let data = if let Some(items) = response.body.get(plural) {
            serde_json::from_value(items.clone())
                .map_err(|source| RestError::Deserialize { key: plural, source })?
        } else if let Some(item) = response.body.get(singular) {
            vec![serde_json::from_value(item.clone())
                .map_err(|source| RestError::Deserialize { key: singular, source })?]
        } else {
            Vec::new()
        };

        Ok(Self {
            data,
            body: response.body,
            page_info: response.page_info,
            api_call_limit: response.api_call_limit,
            request_id,
        })
    }
}

impl<T> Deref for RestResponse<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestResponse<String>>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Product {
        id: u64,
        title: String,
    }

    fn http_response(body: Value, headers: &[(&str, &str)]) -> HttpResponse {
        let headers: HashMap<String, Vec<String>> = headers
            .iter()
            .map(|(name, value)| (name.to_string(), vec![value.to_string()]))
            .collect();
        HttpResponse::new(200, headers, body)
    }

    #[test]
    fn test_single_resource_body() {
        let response = RestResponse::<Product>::from_http_response(
            http_response(
                json!({"product": {"id": 1, "title": "Shirt"}}),
                &[("x-request-id", "abc")],
            ),
            "product",
            "products",
        )
        .unwrap();

        assert_eq!(response.len(), 1);
        assert_eq!(response[0].title, "Shirt");
        assert_eq!(response.request_id(), Some("abc"));
    }

    #[test]
    fn test_collection_body_with_pagination() {
        let response = RestResponse::<Product>::from_http_response(
            http_response(
                json!({"products": [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]}),
                &[(
                    "link",
                    r#"<https://s.myshopify.com/admin/api/2025-10/products.json?page_info=next123>; rel="next""#,
                )],
            ),
            "product",
            "products",
        )
        .unwrap();

        assert_eq!(
            response.into_inner(),
            vec![
                Product { id: 1, title: "A".to_string() },
                Product { id: 2, title: "B".to_string() }
            ]
        );
    }

    #[test]
    fn test_count_and_empty_bodies() {
        let response = RestResponse::<Product>::from_http_response(
            http_response(json!({"count": 42}), &[]),
            "product",
            "products",
        )
        .unwrap();
        assert!(response.is_empty());
        assert_eq!(response.count(), Some(42));
    }

    #[test]
    fn test_mismatched_body_fails() {
        let error = RestResponse::<Product>::from_http_response(
            http_response(json!({"product": {"id": "nope"}}), &[]),
            "product",
            "products",
        )
        .unwrap_err();
        assert!(matches!(error, RestError::Deserialize { key: "product", .. }));
    }
}
