//! Capabilities the resolver consumes. The HTTP-backed implementation lives in
//! [`crate::backend`]; tests plug in their own.

use super::{
    error::LookupError,
    types::{AuthKind, AuthMode, Session},
};
use secrecy::SecretString;
use std::future::Future;
use url::Url;

/// Visitor credentials forwarded to the session lookup.
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    cookie: Option<SecretString>,
}

impl Credentials {
    #[must_use]
    pub fn from_cookie_header(cookie: Option<&str>) -> Self {
        Self {
            cookie: cookie
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(SecretString::from),
        }
    }

    #[must_use]
    pub fn cookie(&self) -> Option<&SecretString> {
        self.cookie.as_ref()
    }
}

/// Resolves the deployment's auth mode and policy flags.
pub trait AuthConfigLookup {
    fn auth_mode(&self) -> impl Future<Output = Result<AuthMode, LookupError>> + Send;
}

/// Resolves the current visitor's session; `Ok(None)` means no session.
pub trait SessionLookup {
    fn current_session(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Option<Session>, LookupError>> + Send;
}

/// Issues the external identity provider URL for a mode and post-login destination.
pub trait AuthorizeUrlIssuer {
    fn authorize_url(
        &self,
        kind: AuthKind,
        next: Option<&str>,
    ) -> impl Future<Output = Result<Url, LookupError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn credentials_from_cookie_header() {
        let credentials = Credentials::from_cookie_header(Some(" fastapiusersauth=abc "));
        assert_eq!(
            credentials.cookie().map(ExposeSecret::expose_secret),
            Some("fastapiusersauth=abc")
        );
        assert!(Credentials::from_cookie_header(Some("  ")).cookie().is_none());
        assert!(Credentials::default().cookie().is_none());
    }
}
