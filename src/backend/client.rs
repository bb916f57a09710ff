use crate::{
    flow::{
        AuthConfigLookup, AuthKind, AuthMode, AuthorizeUrlIssuer, Credentials, LookupError,
        Session, SessionLookup,
    },
    APP_USER_AGENT,
};
use reqwest::{header::COOKIE, Client, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info_span, instrument, Instrument};
use url::Url;

const AUTH_TYPE_PATH: &str = "auth/type";
const ME_PATH: &str = "me";
const HEALTH_PATH: &str = "health";

#[derive(Debug, Deserialize)]
struct AuthTypeResponse {
    auth_type: String,
    #[serde(default)]
    requires_verification: bool,
}

#[derive(Debug, Deserialize)]
struct AuthorizeResponse {
    authorization_url: String,
}

/// User record returned by `GET /me`.
#[derive(Clone, Debug, Deserialize)]
pub struct UserInfo {
    pub is_active: bool,
    pub is_verified: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub oidc_expiry: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub current_token_created_at: Option<OffsetDateTime>,
    /// Token lifetime in seconds, counted from `current_token_created_at`.
    #[serde(default)]
    pub current_token_expiry_length: Option<i64>,
}

impl UserInfo {
    /// Earliest of the token expiry and the OIDC expiry; `None` if neither is known.
    ///
    /// A token expiry outside the representable range is ignored.
    #[must_use]
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        let token_expiry = self
            .current_token_created_at
            .zip(self.current_token_expiry_length)
            .and_then(|(created_at, length)| {
                created_at.checked_add(time::Duration::seconds(length))
            });

        match (token_expiry, self.oidc_expiry) {
            (Some(token), Some(oidc)) => Some(token.min(oidc)),
            (token, oidc) => token.or(oidc),
        }
    }

    #[must_use]
    pub fn into_session(self) -> Session {
        Session {
            is_active: self.is_active,
            is_verified: self.is_verified,
            expires_at: self.expires_at(),
        }
    }
}

/// Backend path issuing the provider URL; `None` for modes without a provider.
const fn authorize_path(kind: AuthKind) -> Option<&'static str> {
    match kind {
        AuthKind::GoogleOauth | AuthKind::Cloud => Some("auth/oauth/authorize"),
        AuthKind::Oidc => Some("auth/oidc/authorize"),
        AuthKind::Saml => Some("auth/saml/authorize"),
        AuthKind::Disabled | AuthKind::Basic => None,
    }
}

fn ensure_success(response: Response) -> Result<Response, LookupError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(LookupError::Status(status))
    }
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    /// Build a client for the backend rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let mut base_url = Url::parse(base_url)?;

        // Url::join replaces the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, LookupError> {
        Ok(self.base_url.join(path)?)
    }

    /// Check that the backend answers its health endpoint.
    ///
    /// # Errors
    /// Returns an error if the request fails or the backend is unhealthy.
    pub async fn ping(&self) -> Result<(), LookupError> {
        let url = self.endpoint(HEALTH_PATH)?;
        let response = self
            .client
            .get(url)
            .send()
            .instrument(info_span!("backend.ping"))
            .await?;
        ensure_success(response).map(|_| ())
    }
}

impl AuthConfigLookup for BackendClient {
    #[instrument(skip(self))]
    async fn auth_mode(&self) -> Result<AuthMode, LookupError> {
        let url = self.endpoint(AUTH_TYPE_PATH)?;
        let response = ensure_success(self.client.get(url).send().await?)?;
        let body: AuthTypeResponse = response.json().await?;
        let kind: AuthKind = body.auth_type.parse()?;

        debug!("auth type: {kind}, requires verification: {}", body.requires_verification);

        Ok(AuthMode::new(kind).with_requires_verification(body.requires_verification))
    }
}

impl SessionLookup for BackendClient {
    #[instrument(skip_all)]
    async fn current_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<Session>, LookupError> {
        // Without a cookie the backend can only say "no session".
        let Some(cookie) = credentials.cookie() else {
            debug!("No session cookie");
            return Ok(None);
        };

        let url = self.endpoint(ME_PATH)?;
        let response = self
            .client
            .get(url)
            .header(COOKIE, cookie.expose_secret())
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("Backend reports no session");
                Ok(None)
            }
            status if status.is_success() => {
                let user: UserInfo = response.json().await?;
                Ok(Some(user.into_session()))
            }
            status => Err(LookupError::Status(status)),
        }
    }
}

impl AuthorizeUrlIssuer for BackendClient {
    #[instrument(skip(self))]
    async fn authorize_url(&self, kind: AuthKind, next: Option<&str>) -> Result<Url, LookupError> {
        let path = authorize_path(kind).ok_or(LookupError::NoProvider(kind))?;

        let mut url = self.endpoint(path)?;
        if let Some(next) = next {
            url.query_pairs_mut().append_pair("next", next);
        }

        let response = ensure_success(self.client.get(url).send().await?)?;
        let body: AuthorizeResponse = response.json().await?;

        Ok(Url::parse(&body.authorization_url)?)
    }
}
