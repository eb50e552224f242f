//! End-to-end checks of configuration, versions and sessions.

use std::time::Duration;

use shopify_admin::{
    ApiKey, ApiSecretKey, ApiVersion, ConfigError, HostUrl, Session, ShopDomain, ShopifyConfig,
};

#[test]
fn test_full_workflow_create_newtypes_build_config_access_fields() {
    let config = ShopifyConfig::builder()
        .api_key(ApiKey::new("test-api-key").unwrap())
        .api_secret_key(ApiSecretKey::new("test-api-secret").unwrap())
        .old_api_secret_key(ApiSecretKey::new("old-secret").unwrap())
        .host(HostUrl::new("https://myapp.example.com").unwrap())
        .api_version(ApiVersion::V2024_10)
        .user_agent_prefix("TestApp/1.0")
        .retry_wait_time(Duration::from_millis(250))
        .build()
        .unwrap();

    assert_eq!(config.api_key().as_ref(), "test-api-key");
    assert_eq!(config.api_secret_key().as_ref(), "test-api-secret");
    assert_eq!(config.old_api_secret_key().unwrap().as_ref(), "old-secret");
    assert_eq!(config.api_version(), &ApiVersion::V2024_10);
    assert_eq!(config.host().unwrap().host_name(), "myapp.example.com");
    assert_eq!(config.user_agent_prefix(), Some("TestApp/1.0"));
    assert_eq!(config.retry_wait_time(), Duration::from_millis(250));
    assert!(!config.is_private_app());
    assert!(config.api_host().is_none());
}

#[test]
fn test_defaults() {
    let config = ShopifyConfig::builder()
        .api_key(ApiKey::new("key").unwrap())
        .api_secret_key(ApiSecretKey::new("secret").unwrap())
        .build()
        .unwrap();

    assert_eq!(config.api_version(), &ApiVersion::latest());
    assert_eq!(config.retry_wait_time(), Duration::from_secs(1));
    assert!(config.host().is_none());
    assert!(config.old_api_secret_key().is_none());
}

#[test]
fn test_error_handling_invalid_inputs_produce_correct_errors() {
    assert!(matches!(ApiKey::new(""), Err(ConfigError::EmptyApiKey)));
    assert!(matches!(ApiSecretKey::new("  "), Err(ConfigError::EmptyApiSecretKey)));
    assert!(matches!(
        ShopDomain::new("invalid domain with spaces"),
        Err(ConfigError::InvalidShopDomain { .. })
    ));
    assert!(matches!(
        ShopDomain::new("shop.example.com"),
        Err(ConfigError::InvalidShopDomain { .. })
    ));
    assert!(matches!(
        HostUrl::new("not-a-valid-url"),
        Err(ConfigError::InvalidHostUrl { .. })
    ));
    assert!(matches!(
        "invalid".parse::<ApiVersion>(),
        Err(ConfigError::InvalidApiVersion { .. })
    ));
    assert!(matches!(
        ShopifyConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .build(),
        Err(ConfigError::MissingRequiredField {
            field: "api_secret_key"
        })
    ));
}

// ============================================================================
// Versions
// ============================================================================

#[test]
fn test_version_parsing_and_ordering() {
    assert_eq!("2025-04".parse::<ApiVersion>().unwrap(), ApiVersion::V2025_04);
    assert_eq!("UNSTABLE".parse::<ApiVersion>().unwrap(), ApiVersion::Unstable);
    assert_eq!(
        "2026-01".parse::<ApiVersion>().unwrap(),
        ApiVersion::Custom("2026-01".to_string())
    );
    assert!("2025-02".parse::<ApiVersion>().is_err());

    let mut versions = vec![
        ApiVersion::Unstable,
        ApiVersion::V2025_10,
        ApiVersion::V2024_10,
        ApiVersion::V2025_04,
    ];
    versions.sort();
    assert_eq!(
        versions,
        vec![
            ApiVersion::V2024_10,
            ApiVersion::V2025_04,
            ApiVersion::V2025_10,
            ApiVersion::Unstable
        ]
    );
    assert!(ApiVersion::latest().is_stable());
    assert!(!ApiVersion::Unstable.is_stable());
}

// ============================================================================
// Sessions
// ============================================================================

#[test]
fn test_offline_session() {
    let shop = ShopDomain::new("my-store").unwrap();
    let session = Session::offline(shop.clone(), "shpat_abc");

    assert_eq!(session.id, Session::offline_id(&shop));
    assert_eq!(session.shop.as_ref(), "my-store.myshopify.com");
    assert_eq!(session.access_token(), Some("shpat_abc"));
    assert!(session.is_active());
}

#[test]
fn test_session_with_empty_token_is_inactive() {
    let session = Session::new(
        "id".to_string(),
        ShopDomain::new("my-store").unwrap(),
        Some(String::new()),
        true,
        None,
    );
    assert_eq!(session.access_token(), None);
    assert!(!session.is_active());
}

#[test]
fn test_config_can_be_cloned_and_shared() {
    let config = ShopifyConfig::builder()
        .api_key(ApiKey::new("key").unwrap())
        .api_secret_key(ApiSecretKey::new("secret").unwrap())
        .build()
        .unwrap();
    let config_clone = config.clone();

    let handle = std::thread::spawn(move || config_clone.api_key().as_ref().to_string());
    assert_eq!(handle.join().unwrap(), config.api_key().as_ref());
}
