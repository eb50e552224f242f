//! SDK configuration.
//!
//! # Overview
//!
//! - [`ShopifyConfig`]: credentials, API version and transport settings
//! - [`ShopifyConfigBuilder`]: fail-fast builder for [`ShopifyConfig`]
//! - [`ApiKey`], [`ApiSecretKey`], [`ShopDomain`], [`HostUrl`]: validated newtypes
//! - [`ApiVersion`]: the Admin API version requests are sent against
//!
//! # Example
//!
//! ```rust
//! use shopify_admin::{ShopifyConfig, ApiKey, ApiSecretKey, ApiVersion, HostUrl};
//!
//! let config = ShopifyConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
//!     .host(HostUrl::new("https://app.example.com").unwrap())
//!     .api_version(ApiVersion::V2025_07)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_version(), &ApiVersion::V2025_07);
//! ```

mod newtypes;
mod version;

pub use newtypes::{ApiKey, ApiSecretKey, HostUrl, ShopDomain};
pub use version::ApiVersion;

use crate::error::ConfigError;
use std::time::Duration;

/// Default pause between retries when the server gives no `Retry-After`.
pub const DEFAULT_RETRY_WAIT_TIME: Duration = Duration::from_secs(1);

/// Settings shared by every client, the webhook registrar and the delivery
/// processor.
///
/// # Key Rotation
///
/// When `old_api_secret_key` is set, inbound webhook signatures that fail
/// against the primary secret are checked again against the old one, so
/// deliveries signed before a rotation are still accepted.
///
/// # Private Apps
///
/// With `is_private_app(true)` the secret key is sent as the access token
/// and sessions need not carry one.
#[derive(Clone, Debug)]
pub struct ShopifyConfig {
    api_key: ApiKey,
    api_secret_key: ApiSecretKey,
    old_api_secret_key: Option<ApiSecretKey>,
    host: Option<HostUrl>,
    api_host: Option<HostUrl>,
    api_version: ApiVersion,
    is_private_app: bool,
    user_agent_prefix: Option<String>,
    retry_wait_time: Duration,
}

impl ShopifyConfig {
    /// Starts a new [`ShopifyConfigBuilder`].
    #[must_use]
    pub fn builder() -> ShopifyConfigBuilder {
        ShopifyConfigBuilder::new()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API secret key.
    #[must_use]
    pub const fn api_secret_key(&self) -> &ApiSecretKey {
        &self.api_secret_key
    }

    /// Returns the previous secret key kept around during rotation.
    #[must_use]
    pub const fn old_api_secret_key(&self) -> Option<&ApiSecretKey> {
        self.old_api_secret_key.as_ref()
    }

    /// Returns the app's public URL, used to build HTTP webhook callbacks.
    #[must_use]
    pub const fn host(&self) -> Option<&HostUrl> {
        self.host.as_ref()
    }

    /// Returns the origin override for Admin API traffic, if any.
    #[must_use]
    pub const fn api_host(&self) -> Option<&HostUrl> {
        self.api_host.as_ref()
    }

    /// Returns the configured API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns whether the app runs in single-tenant private mode.
    #[must_use]
    pub const fn is_private_app(&self) -> bool {
        self.is_private_app
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the fallback wait between retries.
    #[must_use]
    pub const fn retry_wait_time(&self) -> Duration {
        self.retry_wait_time
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ShopifyConfig>();
};

/// Builder for [`ShopifyConfig`].
///
/// `api_key` and `api_secret_key` are required. Everything else defaults:
/// latest API version, no host, no API host override, public app, one
/// second retry wait.
#[derive(Debug, Default)]
pub struct ShopifyConfigBuilder {
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    old_api_secret_key: Option<ApiSecretKey>,
    host: Option<HostUrl>,
    api_host: Option<HostUrl>,
    api_version: Option<ApiVersion>,
    is_private_app: bool,
    user_agent_prefix: Option<String>,
    retry_wait_time: Option<Duration>,
}

impl ShopifyConfigBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API secret key (required).
    #[must_use]
    pub fn api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.api_secret_key = Some(key);
        self
    }

    /// Sets the previous secret key accepted for webhook signatures.
    #[must_use]
    pub fn old_api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.old_api_secret_key = Some(key);
        self
    }

    /// Sets the app's public URL.
    #[must_use]
    pub fn host(mut self, host: HostUrl) -> Self {
        self.host = Some(host);
        self
    }

    /// Sends Admin API traffic to this origin instead of `https://{shop}`.
    ///
    /// Scheme and port are honoured, which makes this suitable for proxies
    /// and local mock servers.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Enables single-tenant private app mode.
    #[must_use]
    pub const fn is_private_app(mut self, private: bool) -> Self {
        self.is_private_app = private;
        self
    }

    /// Sets a prefix prepended to the SDK's `User-Agent`.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the wait used between retries when no `Retry-After` is sent.
    #[must_use]
    pub const fn retry_wait_time(mut self, wait: Duration) -> Self {
        self.retry_wait_time = Some(wait);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` or
    /// `api_secret_key` was not set.
    pub fn build(self) -> Result<ShopifyConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let api_secret_key = self
            .api_secret_key
            .ok_or(ConfigError::MissingRequiredField {
                field: "api_secret_key",
            })?;

        Ok(ShopifyConfig {
            api_key,
            api_secret_key,
            old_api_secret_key: self.old_api_secret_key,
            host: self.host,
            api_host: self.api_host,
            api_version: self.api_version.unwrap_or_else(ApiVersion::latest),
            is_private_app: self.is_private_app,
            user_agent_prefix: self.user_agent_prefix,
            retry_wait_time: self.retry_wait_time.unwrap_or(DEFAULT_RETRY_WAIT_TIME),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> ShopifyConfigBuilder {
        ShopifyConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
    }

    #[test]
    fn test_build_fails_without_api_key() {
        let result = ShopifyConfigBuilder::new()
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_build_fails_without_secret() {
        let result = ShopifyConfigBuilder::new()
            .api_key(ApiKey::new("key").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "api_secret_key"
            })
        ));
    }

    #[test]
    fn test_defaults() {
        let config = credentials().build().unwrap();

        assert_eq!(config.api_version(), &ApiVersion::latest());
        assert!(!config.is_private_app());
        assert!(config.host().is_none());
        assert!(config.api_host().is_none());
        assert!(config.user_agent_prefix().is_none());
        assert!(config.old_api_secret_key().is_none());
        assert_eq!(config.retry_wait_time(), DEFAULT_RETRY_WAIT_TIME);
    }

    #[test]
    fn test_all_optional_fields() {
        let host = HostUrl::new("https://app.example.com").unwrap();
        let api_host = HostUrl::new("http://127.0.0.1:9999").unwrap();

        let config = credentials()
            .old_api_secret_key(ApiSecretKey::new("old-secret").unwrap())
            .host(host.clone())
            .api_host(api_host.clone())
            .api_version(ApiVersion::V2025_04)
            .is_private_app(true)
            .user_agent_prefix("MyApp/1.0")
            .retry_wait_time(Duration::from_millis(10))
            .build()
            .unwrap();

        assert_eq!(config.host(), Some(&host));
        assert_eq!(config.api_host(), Some(&api_host));
        assert_eq!(config.api_version(), &ApiVersion::V2025_04);
        assert!(config.is_private_app());
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
        assert_eq!(config.retry_wait_time(), Duration::from_millis(10));
        assert_eq!(
            config.old_api_secret_key().map(AsRef::as_ref),
            Some("old-secret")
        );
    }

    #[test]
    fn test_debug_never_prints_secrets() {
        let config = credentials().build().unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("ShopifyConfig"));
        assert!(!debug.contains("\"secret\""));
    }
}
