//! HTTP middleware for axum.
//!
//! - `internal_auth` - Shared-secret guard for collaborator endpoints

pub mod internal_auth;

pub use internal_auth::{internal_auth_middleware, InternalToken};
