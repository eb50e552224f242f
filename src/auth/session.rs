//! The authenticated shop context passed to API clients.

use crate::config::ShopDomain;
use chrono::{DateTime, Utc};

/// An authenticated session for one shop.
///
/// Clients read only `shop` and `access_token`; the remaining fields are
/// carried for the application's own bookkeeping.
///
/// ```rust
/// use shopify_admin::{Session, ShopDomain};
///
/// let shop = ShopDomain::new("my-store").unwrap();
/// let session = Session::offline(shop, "shpat_123");
///
/// assert_eq!(session.id, "offline_my-store.myshopify.com");
/// assert!(session.is_active());
/// ```
#[derive(Clone, Debug)]
pub struct Session {
    /// Unique identifier for this session.
    pub id: String,

    /// The shop this session belongs to.
    pub shop: ShopDomain,

    /// Admin API access token. Private apps may leave this empty.
    pub access_token: Option<String>,

    /// Whether the session is tied to a specific staff user.
    pub is_online: bool,

    /// When the token stops being valid, if it expires at all.
    pub expires: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a session from its parts.
    #[must_use]
    pub const fn new(
        id: String,
        shop: ShopDomain,
        access_token: Option<String>,
        is_online: bool,
        expires: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            shop,
            access_token,
            is_online,
            expires,
        }
    }

    /// Creates a non-expiring offline session with the conventional id.
    #[must_use]
    pub fn offline(shop: ShopDomain, access_token: impl Into<String>) -> Self {
        Self {
            id: Self::offline_id(&shop),
            shop,
            access_token: Some(access_token.into()),
            is_online: false,
            expires: None,
        }
    }

    /// Returns `offline_{shop}`.
    #[must_use]
    pub fn offline_id(shop: &ShopDomain) -> String {
        format!("offline_{shop}")
    }

    /// Returns the access token if one is present and non-empty.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|token| !token.is_empty())
    }

    /// Sessions without an expiry never expire.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires.is_some_and(|expires| Utc::now() > expires)
    }

    /// Returns `true` when the session has a token and has not expired.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.access_token().is_some() && !self.expired()
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Session>();
};
