use crate::{
    backend::BackendClient,
    flow::{Destinations, FlowResolver},
    gate::handlers::{health, login},
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
mod openapi;

pub use openapi::openapi;

const DEFAULT_SIGNUP_PATH: &str = "/auth/signup";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Flow resolver wired to the HTTP backend for all three lookups.
pub type LoginFlow = FlowResolver<BackendClient, BackendClient, BackendClient>;

/// Shared, read-only state for the handlers.
#[derive(Debug)]
pub struct GateState {
    flow: LoginFlow,
    backend: BackendClient,
    signup_path: String,
}

impl GateState {
    #[must_use]
    pub fn new(backend: BackendClient, destinations: Destinations) -> Self {
        Self {
            flow: FlowResolver::new(
                backend.clone(),
                backend.clone(),
                backend.clone(),
                destinations,
            ),
            backend,
            signup_path: DEFAULT_SIGNUP_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn with_signup_path(mut self, signup_path: String) -> Self {
        self.signup_path = signup_path;
        self
    }

    #[must_use]
    pub fn flow(&self) -> &LoginFlow {
        &self.flow
    }

    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    #[must_use]
    pub fn signup_path(&self) -> &str {
        &self.signup_path
    }
}

/// Build the application router.
pub fn router(state: Arc<GateState>) -> Router {
    Router::new()
        .route("/auth/login", get(login::login))
        .route("/health", get(health::health).options(health::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, state: GateState) -> Result<()> {
    let app = router(Arc::new(state));

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
