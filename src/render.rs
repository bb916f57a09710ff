//! What the login page shows for a resolved outcome.
//!
//! The view is a pure function of the [`Outcome`]; it holds no decision logic.

use crate::flow::{AuthKind, Outcome};
use serde::Serialize;
use utoipa::ToSchema;

const DEFAULT_SIGNUP_PATH: &str = "/auth/signup";

/// "Continue with provider" button.
#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProviderSignIn {
    pub auth_type: AuthKind,
    pub authorize_url: String,
}

/// In-page email/password form.
#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CredentialsForm {
    /// New accounts must confirm their email before they can sign in.
    pub should_verify: bool,
    pub signup_path: String,
}

/// Everything the page template needs besides static chrome.
#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginView {
    pub provider_sign_in: Option<ProviderSignIn>,
    pub credentials_form: Option<CredentialsForm>,
}

impl LoginView {
    /// Build the view with the default signup link.
    #[must_use]
    pub fn from_outcome(outcome: &Outcome) -> Self {
        Self::with_signup_path(outcome, DEFAULT_SIGNUP_PATH)
    }

    #[must_use]
    pub fn with_signup_path(outcome: &Outcome, signup_path: &str) -> Self {
        let Some(mode) = outcome.mode else {
            return Self::default();
        };

        let provider_sign_in = outcome.authorize_url.as_ref().map(|url| ProviderSignIn {
            auth_type: mode.kind,
            authorize_url: url.to_string(),
        });

        let credentials_form = mode.kind.has_credentials_form().then(|| CredentialsForm {
            should_verify: mode.kind == AuthKind::Cloud,
            signup_path: signup_path.to_string(),
        });

        Self {
            provider_sign_in,
            credentials_form,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::flow::{Action, AuthMode, Degradation};
    use url::Url;

    fn outcome(mode: Option<AuthMode>, authorize_url: Option<&str>) -> Outcome {
        Outcome {
            action: Action::Render,
            mode,
            authorize_url: authorize_url.map(|u| Url::parse(u).unwrap()),
            degraded: Vec::new(),
        }
    }

    #[test]
    fn no_mode_renders_nothing() {
        let mut o = outcome(None, None);
        o.degraded.push(Degradation::ConfigUnavailable);
        assert_eq!(LoginView::from_outcome(&o), LoginView::default());
    }

    #[test]
    fn cloud_shows_button_and_verifying_form() {
        let view = LoginView::from_outcome(&outcome(
            Some(AuthMode::new(AuthKind::Cloud)),
            Some("https://accounts.example.com/auth"),
        ));
        assert_eq!(
            view.provider_sign_in,
            Some(ProviderSignIn {
                auth_type: AuthKind::Cloud,
                authorize_url: "https://accounts.example.com/auth".to_string(),
            })
        );
        assert_eq!(
            view.credentials_form,
            Some(CredentialsForm {
                should_verify: true,
                signup_path: "/auth/signup".to_string(),
            })
        );
    }

    #[test]
    fn basic_without_url_keeps_form() {
        let view = LoginView::with_signup_path(
            &outcome(Some(AuthMode::new(AuthKind::Basic)), None),
            "/register",
        );
        assert_eq!(view.provider_sign_in, None);
        let form = view.credentials_form.unwrap();
        assert!(!form.should_verify);
        assert_eq!(form.signup_path, "/register");
    }

    #[test]
    fn oidc_without_url_is_empty() {
        let view = LoginView::from_outcome(&outcome(Some(AuthMode::new(AuthKind::Oidc)), None));
        assert_eq!(view, LoginView::default());
    }
}
