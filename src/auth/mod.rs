//! Shop sessions and request signing.
//!
//! Obtaining sessions (OAuth, token exchange) and storing them is left to
//! the application. This module only defines the [`Session`] value the
//! clients consume and the HMAC primitives used to verify webhooks.

pub mod hmac;
pub mod session;

pub use session::Session;
