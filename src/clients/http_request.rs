//! Request description consumed by [`HttpClient`](crate::clients::HttpClient).

use std::fmt;

use serde_json::Value;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the Admin API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
        })
    }
}

/// Declared encoding of a request body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    UrlEncoded,
    /// `application/graphql`, raw query text
    GraphQL,
}

impl DataType {
    /// Returns the MIME type sent as `Content-Type`.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::UrlEncoded => "application/x-www-form-urlencoded",
            Self::GraphQL => "application/graphql",
        }
    }

    /// Serializes `body` for the wire.
    ///
    /// String bodies are taken as already encoded and sent verbatim.
    #[must_use]
    pub fn encode(&self, body: &Value) -> String {
        match (self, body) {
            (_, Value::String(raw)) => raw.clone(),
            (Self::UrlEncoded, Value::Object(fields)) => fields
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    format!(
                        "{}={}",
                        urlencoding::encode(key),
                        urlencoding::encode(&value)
                    )
                })
                .collect::<Vec<_>>()
                .join("&"),
            (_, other) => other.to_string(),
        }
    }
}

/// One logical Admin API call.
///
/// `path` is absolute (`/admin/api/2025-10/graphql.json`). `tries` is the
/// total number of attempts the transport may make; `1` means no retry.
///
/// ```rust
/// use shopify_admin::clients::{DataType, HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "/admin/api/2025-10/graphql.json")
///     .body(json!({"query": "{ shop { name } }"}))
///     .body_type(DataType::Json)
///     .tries(3)
///     .build()
///     .unwrap();
/// assert_eq!(request.tries, 3);
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// HTTP method.
    pub http_method: HttpMethod,
    /// Absolute request path.
    pub path: String,
    /// Body, encoded according to `body_type`.
    pub body: Option<Value>,
    /// Body encoding.
    pub body_type: Option<DataType>,
    /// Query string parameters, in order.
    pub query: Vec<(String, String)>,
    /// Caller headers, merged over the client defaults.
    pub extra_headers: Vec<(String, String)>,
    /// Total attempts allowed.
    pub tries: u32,
}

impl HttpRequest {
    /// Starts building a request.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Checks the body/method combination.
    ///
    /// # Errors
    ///
    /// [`InvalidHttpRequestError::MissingBodyType`] when a body has no type,
    /// [`InvalidHttpRequestError::MissingBody`] for POST or PUT without a body.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.body.is_some() && self.body_type.is_none() {
            return Err(InvalidHttpRequestError::MissingBodyType);
        }
        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the encoded body, or `None` when there is nothing to send.
    #[must_use]
    pub fn encoded_body(&self) -> Option<String> {
        let body = self.body.as_ref()?;
        let encoded = self.body_type.unwrap_or(DataType::Json).encode(body);
        (!encoded.is_empty()).then_some(encoded)
    }
}

/// Builder for [`HttpRequest`].
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<Value>,
    body_type: Option<DataType>,
    query: Vec<(String, String)>,
    extra_headers: Vec<(String, String)>,
    tries: i64,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            body_type: None,
            query: Vec::new(),
            extra_headers: Vec::new(),
            tries: 1,
        }
    }

    /// Sets the body. A string value is sent as-is.
    #[must_use]
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the body encoding.
    #[must_use]
    pub const fn body_type(mut self, body_type: DataType) -> Self {
        self.body_type = Some(body_type);
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((key.into(), value.into()));
        self
    }

    /// Appends several headers.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.extra_headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the total number of attempts.
    ///
    /// Zero is treated as one. Negative values are rejected by
    /// [`build`](Self::build).
    #[must_use]
    pub fn tries(mut self, tries: impl Into<i64>) -> Self {
        self.tries = tries.into();
        self
    }

    /// Builds and validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] for negative tries or an invalid
    /// body/method combination.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        if self.tries < 0 {
            return Err(InvalidHttpRequestError::InvalidTries { tries: self.tries });
        }
        let tries = u32::try_from(self.tries.max(1)).unwrap_or(u32::MAX);

        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            body_type: self.body_type,
            query: self.query,
            extra_headers: self.extra_headers,
            tries,
        };
        request.verify()?;
        Ok(request)
    }
}
