//! Generic executor for REST resource descriptors.
//!
//! A resource type describes itself through [`RestResource`]: its body keys
//! and the URL templates it can be reached through. [`RestExecutor::request`]
//! picks a template from the ids the caller has, sends the request through
//! the shared transport and decodes the body into the resource type.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::Session;
use crate::clients::graphql::{credential, ACCESS_TOKEN_HEADER};
use crate::clients::{DataType, HttpClient, HttpError, HttpMethod, HttpRequest};
use crate::config::{ApiVersion, ShopifyConfig};
use crate::rest::errors::RestError;
use crate::rest::path::{build_path, get_path, ResourceOperation, ResourcePath};
use crate::rest::response::RestResponse;

/// Describes a REST resource to [`RestExecutor`].
///
/// ```rust
/// use serde::Deserialize;
/// use shopify_admin::clients::HttpMethod;
/// use shopify_admin::rest::{ResourceOperation, ResourcePath, RestResource};
///
/// #[derive(Debug, Deserialize)]
/// struct Variant {
///     id: u64,
///     price: String,
/// }
///
/// impl RestResource for Variant {
///     const NAME: &'static str = "variant";
///     const PLURAL: &'static str = "variants";
///     const PATHS: &'static [ResourcePath] = &[
///         ResourcePath::new(HttpMethod::Get, ResourceOperation::All, &["product_id"], "products/{product_id}/variants"),
///         ResourcePath::new(HttpMethod::Get, ResourceOperation::Find, &["id"], "variants/{id}"),
///         ResourcePath::new(HttpMethod::Put, ResourceOperation::Update, &["id"], "variants/{id}"),
///     ];
/// }
/// ```
pub trait RestResource: DeserializeOwned + Send + Sync {
    /// Body key of a single resource, e.g. `variant`.
    const NAME: &'static str;
    /// Body key of a collection, e.g. `variants`.
    const PLURAL: &'static str;
    /// Templates this resource is reachable through.
    const PATHS: &'static [ResourcePath];
}

/// Sends REST resource requests for one session.
#[derive(Debug, Clone)]
pub struct RestExecutor {
    http_client: HttpClient,
    api_version: ApiVersion,
    access_token: String,
    tries: u32,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestExecutor>();
};

impl RestExecutor {
    /// Creates an executor using the configured API version.
    ///
    /// # Errors
    ///
    /// [`RestError::MissingAccessToken`] when the app is not private and the
    /// session has no token; [`RestError::Http`] if the transport cannot be
    /// built.
    pub fn new(session: &Session, config: &ShopifyConfig) -> Result<Self, RestError> {
        let access_token = credential(session, config).ok_or(RestError::MissingAccessToken)?;
        Ok(Self {
            http_client: HttpClient::new(&session.shop, Some(config))?,
            api_version: config.api_version().clone(),
            access_token,
            tries: 1,
        })
    }

    /// Pins requests to `version`.
    #[must_use]
    pub fn with_version(mut self, version: ApiVersion) -> Self {
        if version != self.api_version {
            tracing::debug!(
                "REST executor overriding default API version {} with {}",
                self.api_version,
                version
            );
        }
        self.api_version = version;
        self
    }

    /// Sets the attempt budget per request.
    #[must_use]
    pub const fn with_tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    /// Returns the version used for requests.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Runs `operation` on resource `R`.
    ///
    /// `url_ids` fill the path placeholders and select the most specific
    /// template. `params` (a JSON object) become query parameters; nulls
    /// are skipped and arrays are comma-joined. `body` is sent as JSON.
    ///
    /// # Errors
    ///
    /// - [`RestError::PathResolutionFailed`] when no template fits `url_ids`
    /// - [`RestError::NotFound`] for a 404 on a request that named an `id`
    /// - [`RestError::Http`] for other transport failures
    /// - [`RestError::Deserialize`] when the body does not decode into `R`
    ///
    /// ```rust,ignore
    /// let executor = RestExecutor::new(&session, &config)?;
    /// let variants = executor
    ///     .request::<Variant>(
    ///         ResourceOperation::All,
    ///         &[("product_id", "632910392")],
    ///         Some(json!({"limit": 50})),
    ///         None,
    ///     )
    ///     .await?;
    /// for variant in variants.iter() {
    ///     println!("{} {}", variant.id, variant.price);
    /// }
    /// ```
    pub async fn request<R: RestResource>(
        &self,
        operation: ResourceOperation,
        url_ids: &[(&str, impl Display)],
        params: Option<Value>,
        body: Option<Value>,
    ) -> Result<RestResponse<R>, RestError> {
        let available: Vec<&str> = url_ids.iter().map(|(name, _)| *name).collect();
        let path = get_path(R::PATHS, operation, &available).ok_or(
            RestError::PathResolutionFailed {
                resource: R::NAME,
                operation: operation.as_str(),
            },
        )?;
        let full_path = format!(
            "/admin/api/{}/{}.json",
            self.api_version,
            build_path(path.template, url_ids)
        );

        let mut builder = HttpRequest::builder(path.http_method, full_path)
            .header(ACCESS_TOKEN_HEADER, self.access_token.as_str())
            .tries(self.tries);
        for (key, value) in params.as_ref().map(query_pairs).unwrap_or_default() {
            builder = builder.query_param(key, value);
        }
        if let Some(body) = body {
            builder = builder.body(body).body_type(DataType::Json);
        } else if matches!(path.http_method, HttpMethod::Post | HttpMethod::Put) {
            builder = builder
                .body(Value::Object(serde_json::Map::new()))
                .body_type(DataType::Json);
        }
        let request = builder.build().map_err(HttpError::from)?;

        let response = match self.http_client.request(request).await {
            Ok(response) => response,
            Err(error) if error.status_code() == Some(404) => {
                let id = url_ids
                    .iter()
                    .find(|(name, _)| *name == "id")
                    .map(|(_, value)| value.to_string());
                return Err(match id {
                    Some(id) => RestError::NotFound {
                        resource: R::NAME,
                        id,
                    },
                    None => error.into(),
                });
            }
            Err(error) => return Err(error.into()),
        };

        RestResponse::from_http_response(response, R::NAME, R::PLURAL)
    }
}

/// Flattens a JSON object into query pairs.
fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = params else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(text) => text.clone(),
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            };
            Some((key.clone(), value))
        })
        .collect()
}
