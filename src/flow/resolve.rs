use super::{
    error::LookupError,
    lookup::{AuthConfigLookup, AuthorizeUrlIssuer, Credentials, SessionLookup},
    types::{AuthMode, NavigationRequest, Session},
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};
use url::Url;
use utoipa::ToSchema;

const DEFAULT_LANDING: &str = "/";
const DEFAULT_VERIFICATION_PENDING: &str = "/auth/waiting-on-verification";

/// Where the resolver sends visitors that do not need to sign in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Destinations {
    default_landing: String,
    verification_pending: String,
}

impl Default for Destinations {
    fn default() -> Self {
        Self {
            default_landing: DEFAULT_LANDING.to_string(),
            verification_pending: DEFAULT_VERIFICATION_PENDING.to_string(),
        }
    }
}

impl Destinations {
    #[must_use]
    pub fn with_default_landing(mut self, path: String) -> Self {
        self.default_landing = path;
        self
    }

    #[must_use]
    pub fn with_verification_pending(mut self, path: String) -> Self {
        self.verification_pending = path;
        self
    }

    #[must_use]
    pub fn default_landing(&self) -> &str {
        &self.default_landing
    }

    #[must_use]
    pub fn verification_pending(&self) -> &str {
        &self.verification_pending
    }
}

/// Named degraded state caused by a failed lookup.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    ConfigUnavailable,
    SessionUnavailable,
    AuthorizeUrlUnavailable,
}

/// What the page handler must do.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    /// Redirect unconditionally.
    GoTo(String),
    /// Show the in-page UI for the outcome's mode (if any).
    Render,
    /// An authorize URL was issued and the visitor stays on the page to pick it.
    IssueThenMaybeGo,
}

/// Result of one resolution pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub action: Action,
    pub mode: Option<AuthMode>,
    pub authorize_url: Option<Url>,
    pub degraded: Vec<Degradation>,
}

impl Outcome {
    fn go_to(destination: &str, mode: Option<AuthMode>) -> Self {
        Self {
            action: Action::GoTo(destination.to_string()),
            mode,
            authorize_url: None,
            degraded: Vec::new(),
        }
    }

    /// Redirect target, if the outcome is a redirect.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match &self.action {
            Action::GoTo(destination) => Some(destination),
            Action::Render | Action::IssueThenMaybeGo => None,
        }
    }
}

/// Joined results of the two independent lookups.
#[derive(Debug)]
pub struct Snapshot {
    pub mode: Result<AuthMode, LookupError>,
    pub session: Result<Option<Session>, LookupError>,
}

/// Either a final outcome, or a known mode still waiting for its authorize URL.
#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    Finished(Outcome),
    NeedsAuthorizeUrl {
        mode: AuthMode,
        degraded: Vec<Degradation>,
    },
}

/// Apply the ordered rules to a lookup snapshot.
///
/// Rules, first match wins:
/// 1. Config lookup failed: render with no mode. The session is not consulted.
/// 2. Auth disabled: go to the default landing page.
/// 3. Live session: go to verification-pending if the mode requires verification
///    and the user is unverified, else to the default landing page.
/// 4. Otherwise the visitor has to sign in and an authorize URL is needed.
///
/// A failed session lookup counts as "no live session".
#[must_use]
pub fn decide(snapshot: Snapshot, destinations: &Destinations, now: OffsetDateTime) -> Decision {
    let mode = match snapshot.mode {
        Ok(mode) => mode,
        Err(err) => {
            warn!("Auth config lookup failed, rendering without a mode: {err}");
            return Decision::Finished(Outcome {
                action: Action::Render,
                mode: None,
                authorize_url: None,
                degraded: vec![Degradation::ConfigUnavailable],
            });
        }
    };

    if mode.is_disabled() {
        debug!("Auth disabled, redirecting to {}", destinations.default_landing());
        return Decision::Finished(Outcome::go_to(destinations.default_landing(), Some(mode)));
    }

    let mut degraded = Vec::new();
    let session = match snapshot.session {
        Ok(session) => session,
        Err(err) => {
            warn!("Session lookup failed, treating visitor as signed out: {err}");
            degraded.push(Degradation::SessionUnavailable);
            None
        }
    };

    if let Some(session) = session.filter(|s| s.is_live(now)) {
        if mode.requires_verification && !session.is_verified {
            debug!("Live session is unverified");
            return Decision::Finished(Outcome::go_to(
                destinations.verification_pending(),
                Some(mode),
            ));
        }
        debug!("Live session, skipping login");
        return Decision::Finished(Outcome::go_to(destinations.default_landing(), Some(mode)));
    }

    Decision::NeedsAuthorizeUrl { mode, degraded }
}

/// Turn the issuer result into the final outcome for a visitor who must sign in.
///
/// - issuer failed: render the mode without a provider URL
/// - auto-redirect mode and not overridden: go to the provider
/// - auto-redirect overridden: render with the URL available
/// - otherwise: issued, the visitor chooses on the page
#[must_use]
pub fn conclude(
    mode: AuthMode,
    issued: Result<Url, LookupError>,
    auto_redirect_disabled: bool,
    mut degraded: Vec<Degradation>,
) -> Outcome {
    let url = match issued {
        Ok(url) => url,
        Err(LookupError::NoProvider(kind)) => {
            debug!("No identity provider for auth type {kind}");
            return Outcome {
                action: Action::Render,
                mode: Some(mode),
                authorize_url: None,
                degraded,
            };
        }
        Err(err) => {
            warn!("Authorize URL lookup failed, hiding provider sign-in: {err}");
            degraded.push(Degradation::AuthorizeUrlUnavailable);
            return Outcome {
                action: Action::Render,
                mode: Some(mode),
                authorize_url: None,
                degraded,
            };
        }
    };

    let action = if mode.auto_redirect && !auto_redirect_disabled {
        debug!("Auto-redirecting to identity provider");
        Action::GoTo(url.to_string())
    } else if mode.auto_redirect {
        debug!("Auto-redirect disabled by request");
        Action::Render
    } else {
        Action::IssueThenMaybeGo
    };

    Outcome {
        action,
        mode: Some(mode),
        authorize_url: Some(url),
        degraded,
    }
}

/// Resolves the login flow against the three lookups.
#[derive(Clone, Debug)]
pub struct FlowResolver<C, S, I> {
    config: C,
    sessions: S,
    issuer: I,
    destinations: Destinations,
    clock: fn() -> OffsetDateTime,
}

impl<C, S, I> FlowResolver<C, S, I>
where
    C: AuthConfigLookup + Sync,
    S: SessionLookup + Sync,
    I: AuthorizeUrlIssuer + Sync,
{
    #[must_use]
    pub fn new(config: C, sessions: S, issuer: I, destinations: Destinations) -> Self {
        Self {
            config,
            sessions,
            issuer,
            destinations,
            clock: OffsetDateTime::now_utc,
        }
    }

    /// Replace the wall clock used for session expiry checks.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Run one resolution pass. Never fails; lookup failures degrade the outcome.
    #[instrument(
        skip_all,
        fields(
            next = request.next.as_deref(),
            auto_redirect_disabled = request.auto_redirect_disabled
        )
    )]
    pub async fn resolve(&self, request: &NavigationRequest, credentials: &Credentials) -> Outcome {
        let (mode, session) = tokio::join!(
            self.config.auth_mode(),
            self.sessions.current_session(credentials)
        );

        let now = (self.clock)();
        match decide(Snapshot { mode, session }, &self.destinations, now) {
            Decision::Finished(outcome) => outcome,
            Decision::NeedsAuthorizeUrl { mode, degraded } => {
                let issued = self
                    .issuer
                    .authorize_url(mode.kind, request.next.as_deref())
                    .await;
                conclude(mode, issued, request.auto_redirect_disabled, degraded)
            }
        }
    }
}
