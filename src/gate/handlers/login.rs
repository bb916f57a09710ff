//! Login landing page endpoint.
//!
//! Resolves the flow for the incoming request and either redirects (`307`) or
//! returns the page model the template renders.

use crate::{
    flow::{Action, AuthMode, Credentials, Degradation, NavigationRequest, Outcome},
    gate::GateState,
    render::LoginView,
};
use axum::{
    extract::{Extension, RawQuery},
    http::{
        header::{InvalidHeaderValue, COOKIE, LOCATION},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

/// Query parameters accepted by the login page.
#[derive(IntoParams, Debug)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct LoginQuery {
    /// Where to send the visitor after signing in. Only the first value is used.
    next: Option<String>,
    /// Keeps the visitor on the page even for auto-redirect modes.
    /// Only the exact value `true` enables the override.
    #[param(rename = "disableAutoRedirect")]
    disable_auto_redirect: Option<String>,
}

#[derive(ToSchema, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PageAction {
    Render,
    IssueThenMaybeGo,
}

/// Page model for outcomes that stay on the login page.
#[derive(ToSchema, Serialize, Debug)]
pub struct LoginPage {
    pub action: PageAction,
    pub mode: Option<AuthMode>,
    pub authorize_url: Option<String>,
    pub degraded: Vec<Degradation>,
    pub view: LoginView,
}

impl LoginPage {
    fn new(action: PageAction, outcome: Outcome, view: LoginView) -> Self {
        Self {
            action,
            mode: outcome.mode,
            authorize_url: outcome.authorize_url.map(String::from),
            degraded: outcome.degraded,
            view,
        }
    }
}

/// The redirect decision could not be turned into a response.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("invalid redirect location {destination:?}: {source}")]
    InvalidLocation {
        destination: String,
        #[source]
        source: InvalidHeaderValue,
    },
}

impl IntoResponse for NavigationError {
    fn into_response(self) -> Response {
        error!("Failed to redirect: {self}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// Terminate the request with a redirect to `destination`.
///
/// # Errors
/// Returns an error if the destination is not a valid `Location` header value.
pub fn navigate(destination: &str) -> Result<Response, NavigationError> {
    let location =
        HeaderValue::from_str(destination).map_err(|source| NavigationError::InvalidLocation {
            destination: destination.to_string(),
            source,
        })?;
    Ok((StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location)]).into_response())
}

/// Join every `Cookie` header; HTTP/2 clients may split them.
fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let cookies: Vec<&str> = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    if cookies.is_empty() {
        None
    } else {
        Some(cookies.join("; "))
    }
}

#[utoipa::path(
    get,
    path = "/auth/login",
    params(LoginQuery),
    responses(
        (status = 200, description = "Visitor must sign in on this page", body = LoginPage),
        (status = 307, description = "Visitor is sent elsewhere (landing page, verification or identity provider)"),
        (status = 500, description = "Redirect could not be issued")
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    state: Extension<Arc<GateState>>,
) -> Result<Response, NavigationError> {
    let request = NavigationRequest::from_query(query.as_deref());
    let credentials = Credentials::from_cookie_header(cookie_header(&headers).as_deref());

    let outcome = state.flow().resolve(&request, &credentials).await;

    let action = match &outcome.action {
        Action::GoTo(destination) => {
            debug!("Redirecting to {destination}");
            return navigate(destination);
        }
        Action::Render => PageAction::Render,
        Action::IssueThenMaybeGo => PageAction::IssueThenMaybeGo,
    };

    let view = LoginView::with_signup_path(&outcome, state.signup_path());
    let page = LoginPage::new(action, outcome, view);

    Ok((StatusCode::OK, Json(page)).into_response())
}
