//! Login flow resolution.
//!
//! Flow Overview:
//! 1. Auth mode and session are looked up concurrently (joined, both results kept).
//! 2. [`decide`] applies the ordered rules: disabled auth, live session, sign-in.
//! 3. Only when the visitor has to sign in is an authorize URL requested, and
//!    [`conclude`] turns the issuer result into the final [`Outcome`].
//!
//! Lookups never abort resolution; each failure becomes a [`Degradation`].

mod error;
mod lookup;
mod resolve;
mod types;

pub use error::LookupError;
pub use lookup::{AuthConfigLookup, AuthorizeUrlIssuer, Credentials, SessionLookup};
pub use resolve::{
    conclude, decide, Action, Decision, Degradation, Destinations, FlowResolver, Outcome, Snapshot,
};
pub use types::{AuthKind, AuthMode, NavigationRequest, Session};
