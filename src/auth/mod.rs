//! Authentication
//!
//! Provides:
//! - JWT token encoding/decoding (`jwt` submodule)
//! - the `require_auth` middleware and the `AuthUser` extractor

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::AuthUser;
pub use middleware::require_auth;
