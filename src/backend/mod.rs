//! HTTP client for the auth backend.
//!
//! One [`BackendClient`] implements all three lookups the resolver needs:
//! - `GET /auth/type` for the auth mode
//! - `GET /me` (with the visitor's cookie) for the session
//! - `GET /auth/{oauth,oidc,saml}/authorize` for the provider URL

mod client;

pub use client::{BackendClient, UserInfo};
