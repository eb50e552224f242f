//! REST resource boundary.
//!
//! Resource types are plain serde structs that implement [`RestResource`];
//! [`RestExecutor`] resolves their URL templates, calls the transport and
//! decodes the body into a [`RestResponse`].
//!
//! ```rust,ignore
//! use shopify_admin::rest::{ResourceOperation, RestExecutor};
//!
//! let executor = RestExecutor::new(&session, &config)?;
//! let product = executor
//!     .request::<Product>(ResourceOperation::Find, &[("id", 632910392)], None, None)
//!     .await?;
//! println!("{}", product[0].title);
//!
//! let count = executor
//!     .request::<Product>(ResourceOperation::Count, &[] as &[(&str, u64)], None, None)
//!     .await?
//!     .count();
//! ```

mod errors;
mod executor;
mod path;
mod response;

pub use errors::RestError;
pub use executor::{RestExecutor, RestResource};
pub use path::{build_path, get_path, ResourceOperation, ResourcePath};
pub use response::RestResponse;
