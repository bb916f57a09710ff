use crate::{
    backend::BackendClient,
    cli::telemetry,
    flow::Destinations,
    gate::{self, GateState},
};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub backend_url: String,
    pub backend_timeout_seconds: u64,
    pub default_landing: String,
    pub verification_path: String,
    pub signup_path: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the backend client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let backend = BackendClient::new(
        &args.backend_url,
        Duration::from_secs(args.backend_timeout_seconds),
    )
    .with_context(|| format!("Invalid backend URL: {}", args.backend_url))?;

    debug!("Auth backend: {}", backend.base_url());

    let destinations = Destinations::default()
        .with_default_landing(args.default_landing)
        .with_verification_pending(args.verification_path);

    let state = GateState::new(backend, destinations).with_signup_path(args.signup_path);

    let result = gate::new(args.port, state).await;

    telemetry::shutdown_tracer();

    result
}
