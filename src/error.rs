//! Configuration errors for the Admin SDK.
//!
//! Every validated newtype and the [`ShopifyConfigBuilder`](crate::ShopifyConfigBuilder)
//! return `Result<T, ConfigError>` so that bad settings are caught before any
//! request leaves the process.
//!
//! # Example
//!
//! ```rust
//! use shopify_admin::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors raised while building SDK configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Shopify API key.")]
    EmptyApiKey,

    /// API secret key cannot be empty.
    #[error("API secret key cannot be empty. Please provide a valid Shopify API secret key.")]
    EmptyApiSecretKey,

    /// Shop domain is invalid.
    #[error("Invalid shop domain '{domain}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The rejected domain.
        domain: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM' (e.g., '2024-01') or 'unstable'.")]
    InvalidApiVersion {
        /// The rejected version string.
        version: String,
    },

    /// A required builder field was never set.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://myapp.example.com').")]
    InvalidHostUrl {
        /// The rejected URL.
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_shop_domain_message_names_domain() {
        let error = ConfigError::InvalidShopDomain {
            domain: "bad domain!".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("bad domain!"));
        assert!(message.contains("Expected format"));
    }

    #[test]
    fn test_missing_required_field_message() {
        let message = ConfigError::MissingRequiredField {
            field: "api_secret_key",
        }
        .to_string();
        assert!(message.contains("api_secret_key"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_invalid_host_url_message() {
        let message = ConfigError::InvalidHostUrl {
            url: "not a url".to_string(),
        }
        .to_string();
        assert!(message.contains("'not a url'"));
    }

    #[test]
    fn test_config_error_is_std_error() {
        let error = ConfigError::EmptyApiSecretKey;
        let _: &dyn std::error::Error = &error;
    }
}
