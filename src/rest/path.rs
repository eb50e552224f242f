//! URL templates for REST resources.
//!
//! A resource can usually be reached through several templates, e.g. a
//! variant under `products/{product_id}/variants/{id}` or on its own under
//! `variants/{id}`. [`get_path`] picks the most specific template whose ids
//! are all known, and [`build_path`] fills in the placeholders.
//!
//! ```rust
//! use shopify_admin::clients::HttpMethod;
//! use shopify_admin::rest::{build_path, get_path, ResourceOperation, ResourcePath};
//!
//! const PATHS: &[ResourcePath] = &[
//!     ResourcePath::new(
//!         HttpMethod::Get,
//!         ResourceOperation::Find,
//!         &["product_id", "id"],
//!         "products/{product_id}/variants/{id}",
//!     ),
//!     ResourcePath::new(HttpMethod::Get, ResourceOperation::Find, &["id"], "variants/{id}"),
//! ];
//!
//! let path = get_path(PATHS, ResourceOperation::Find, &["product_id", "id"]).unwrap();
//! assert_eq!(
//!     build_path(path.template, &[("product_id", 632), ("id", 808)]),
//!     "products/632/variants/808"
//! );
//! assert_eq!(
//!     get_path(PATHS, ResourceOperation::Find, &["id"]).unwrap().template,
//!     "variants/{id}"
//! );
//! ```

use std::fmt::{self, Display};

use crate::clients::HttpMethod;

/// What a request does to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    /// `GET resources/{id}`
    Find,
    /// `GET resources`
    All,
    /// `POST resources`
    Create,
    /// `PUT resources/{id}`
    Update,
    /// `DELETE resources/{id}`
    Delete,
    /// `GET resources/count`
    Count,
    /// A named action such as `cancel` or `close`.
    Custom(&'static str),
}

impl ResourceOperation {
    /// Name used in logs and errors.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::All => "all",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Count => "count",
            Self::Custom(name) => *name,
        }
    }
}

impl Display for ResourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One way of reaching a resource for an operation.
///
/// `template` is relative to `/admin/api/{version}/` and has no `.json`
/// suffix; `{name}` placeholders correspond to `ids`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePath {
    /// Method sent for this template.
    pub http_method: HttpMethod,
    /// Operation served.
    pub operation: ResourceOperation,
    /// Placeholder names the template needs.
    pub ids: &'static [&'static str],
    /// URL template.
    pub template: &'static str,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceOperation>();
    assert_send_sync::<ResourcePath>();
};

impl ResourcePath {
    /// Creates a path. `const` so resources can declare their paths as
    /// constants.
    #[must_use]
    pub const fn new(
        http_method: HttpMethod,
        operation: ResourceOperation,
        ids: &'static [&'static str],
        template: &'static str,
    ) -> Self {
        Self {
            http_method,
            operation,
            ids,
            template,
        }
    }

    /// `true` when every id this template needs is in `available_ids`.
    #[must_use]
    pub fn matches_ids(&self, available_ids: &[&str]) -> bool {
        self.ids.iter().all(|id| available_ids.contains(id))
    }
}

/// Most specific path for `operation` whose ids are all available.
#[must_use]
pub fn get_path<'a>(
    paths: &'a [ResourcePath],
    operation: ResourceOperation,
    available_ids: &[&str],
) -> Option<&'a ResourcePath> {
    paths
        .iter()
        .filter(|path| path.operation == operation && path.matches_ids(available_ids))
        .max_by_key(|path| path.ids.len())
}

/// Replaces each `{name}` in `template` with its value from `ids`.
///
/// Values are percent-encoded, so string ids cannot introduce extra path
/// segments.
#[must_use]
pub fn build_path<V: Display>(template: &str, ids: &[(&str, V)]) -> String {
    ids.iter().fold(template.to_string(), |path, (name, value)| {
        path.replace(
            &format!("{{{name}}}"),
            &urlencoding::encode(&value.to_string()),
        )
    })
}
