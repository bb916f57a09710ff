use super::error::LookupError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use time::OffsetDateTime;
use url::form_urlencoded;
use utoipa::ToSchema;

const PARAM_NEXT: &str = "next";
const PARAM_DISABLE_AUTO_REDIRECT: &str = "disableAutoRedirect";

/// Deployment-wide authentication mechanism.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    /// No authentication at all; everyone goes to the landing page.
    Disabled,
    /// Email and password only.
    Basic,
    /// Google OAuth.
    GoogleOauth,
    /// Generic OpenID Connect provider.
    Oidc,
    /// SAML identity provider.
    Saml,
    /// Managed cloud: OAuth plus email and password.
    Cloud,
}

impl AuthKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Basic => "basic",
            Self::GoogleOauth => "google_oauth",
            Self::Oidc => "oidc",
            Self::Saml => "saml",
            Self::Cloud => "cloud",
        }
    }

    /// Enterprise SSO modes skip the choice screen and go straight to the provider.
    #[must_use]
    pub const fn auto_redirects(self) -> bool {
        matches!(self, Self::Oidc | Self::Saml)
    }

    /// Modes that offer the in-page email/password form.
    #[must_use]
    pub const fn has_credentials_form(self) -> bool {
        matches!(self, Self::Basic | Self::Cloud)
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthKind {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled" => Ok(Self::Disabled),
            "basic" => Ok(Self::Basic),
            "google_oauth" => Ok(Self::GoogleOauth),
            "oidc" => Ok(Self::Oidc),
            "saml" => Ok(Self::Saml),
            "cloud" => Ok(Self::Cloud),
            other => Err(LookupError::UnknownAuthKind(other.to_string())),
        }
    }
}

/// Resolved auth configuration plus its policy flags.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthMode {
    pub kind: AuthKind,
    pub requires_verification: bool,
    pub auto_redirect: bool,
}

impl AuthMode {
    /// Mode with the kind's default redirect policy and no verification requirement.
    #[must_use]
    pub const fn new(kind: AuthKind) -> Self {
        Self {
            kind,
            requires_verification: false,
            auto_redirect: kind.auto_redirects(),
        }
    }

    #[must_use]
    pub const fn with_requires_verification(mut self, requires_verification: bool) -> Self {
        self.requires_verification = requires_verification;
        self
    }

    #[must_use]
    pub const fn with_auto_redirect(mut self, auto_redirect: bool) -> Self {
        self.auto_redirect = auto_redirect;
        self
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self.kind, AuthKind::Disabled)
    }
}

/// Snapshot of the visitor's session as reported by the backend.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Session {
    pub is_active: bool,
    pub is_verified: bool,
    /// `None` means the session never expires.
    pub expires_at: Option<OffsetDateTime>,
}

impl Session {
    /// Active and not yet expired. Verification status does not matter here.
    #[must_use]
    pub fn is_live(&self, now: OffsetDateTime) -> bool {
        self.is_active && self.expires_at.map_or(true, |expires_at| now < expires_at)
    }
}

/// Inbound request context for the login page.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NavigationRequest {
    /// Post-login destination.
    pub next: Option<String>,
    pub auto_redirect_disabled: bool,
}

impl NavigationRequest {
    /// Parse `next` and `disableAutoRedirect` from a raw query string.
    ///
    /// Repeated parameters keep their first value; an empty `next` counts as absent.
    #[must_use]
    pub fn from_query(query: Option<&str>) -> Self {
        let mut next: Option<Option<String>> = None;
        let mut disable: Option<bool> = None;

        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                PARAM_NEXT if next.is_none() => {
                    next = Some(Some(value.into_owned()).filter(|v| !v.is_empty()));
                }
                PARAM_DISABLE_AUTO_REDIRECT if disable.is_none() => {
                    disable = Some(value == "true");
                }
                _ => {}
            }
        }

        Self {
            next: next.flatten(),
            auto_redirect_disabled: disable.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::datetime, Duration};

    const NOW: OffsetDateTime = datetime!(2024-05-01 12:00:00 UTC);

    fn session(expires_at: Option<OffsetDateTime>) -> Session {
        Session {
            is_active: true,
            is_verified: true,
            expires_at,
        }
    }

    #[test]
    fn auth_kind_parses_backend_names() {
        for kind in [
            AuthKind::Disabled,
            AuthKind::Basic,
            AuthKind::GoogleOauth,
            AuthKind::Oidc,
            AuthKind::Saml,
            AuthKind::Cloud,
        ] {
            assert_eq!(kind.as_str().parse::<AuthKind>().ok(), Some(kind));
        }
        assert!(matches!(
            "kerberos".parse::<AuthKind>(),
            Err(LookupError::UnknownAuthKind(name)) if name == "kerberos"
        ));
    }

    #[test]
    fn auth_kind_serializes_snake_case() {
        let value = serde_json::to_value(AuthKind::GoogleOauth).ok();
        assert_eq!(value, Some(serde_json::json!("google_oauth")));
    }

    #[test]
    fn auth_mode_defaults_follow_kind() {
        assert!(AuthMode::new(AuthKind::Oidc).auto_redirect);
        assert!(AuthMode::new(AuthKind::Saml).auto_redirect);
        assert!(!AuthMode::new(AuthKind::Cloud).auto_redirect);
        assert!(!AuthMode::new(AuthKind::Basic).requires_verification);
        assert!(AuthMode::new(AuthKind::Disabled).is_disabled());
    }

    #[test]
    fn session_without_expiry_never_expires() {
        let s = session(None);
        assert!(s.is_live(NOW));
    }

    #[test]
    fn session_expiry_boundary() {
        let s = session(Some(NOW));
        assert!(!s.is_live(NOW));

        let s = session(Some(NOW - Duration::minutes(5)));
        assert!(!s.is_live(NOW));

        let s = session(Some(NOW + Duration::seconds(90)));
        assert!(s.is_live(NOW));
    }

    #[test]
    fn inactive_session_is_not_live() {
        let s = Session {
            is_active: false,
            ..session(None)
        };
        assert!(!s.is_live(NOW));
    }

    #[test]
    fn navigation_request_first_next_wins() {
        let request = NavigationRequest::from_query(Some("next=%2Fdocs&next=%2Fadmin"));
        assert_eq!(request.next.as_deref(), Some("/docs"));
        assert!(!request.auto_redirect_disabled);
    }

    #[test]
    fn navigation_request_empty_next_is_absent() {
        assert_eq!(NavigationRequest::from_query(Some("next=")).next, None);
        assert_eq!(NavigationRequest::from_query(None), NavigationRequest::default());
    }

    #[test]
    fn navigation_request_disable_flag_requires_true() {
        let disabled = |query| NavigationRequest::from_query(Some(query)).auto_redirect_disabled;
        assert!(disabled("disableAutoRedirect=true"));
        assert!(!disabled("disableAutoRedirect=1"));
        assert!(!disabled("disableAutoRedirect=false&disableAutoRedirect=true"));
    }
}
