use super::types::AuthKind;
use thiserror::Error;

/// Failure of one of the external lookups.
///
/// These are never shown to the visitor; the resolver maps each one to a
/// degraded outcome.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unknown auth type: {0}")]
    UnknownAuthKind(String),
    #[error("auth type {0} has no external identity provider")]
    NoProvider(AuthKind),
}
