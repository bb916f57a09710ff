use clap::{Arg, ArgMatches, Command};
use url::Url;

pub const ARG_BACKEND_URL: &str = "backend-url";
pub const ARG_BACKEND_TIMEOUT: &str = "backend-timeout";

const DEFAULT_BACKEND_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Options {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Options {
    /// Parse backend arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the backend URL is missing or not HTTP(S).
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let url = match matches.get_one::<String>(ARG_BACKEND_URL).cloned() {
            Some(value) if !value.trim().is_empty() => value,
            _ => anyhow::bail!("missing required argument: --{ARG_BACKEND_URL}"),
        };

        let parsed = Url::parse(&url)
            .map_err(|e| anyhow::anyhow!("invalid --{ARG_BACKEND_URL} {url}: {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!(
                "unsupported scheme {} for --{ARG_BACKEND_URL}, expected http or https",
                parsed.scheme()
            );
        }

        Ok(Self {
            url,
            timeout_seconds: matches
                .get_one::<u64>(ARG_BACKEND_TIMEOUT)
                .copied()
                .unwrap_or(DEFAULT_BACKEND_TIMEOUT_SECONDS),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BACKEND_URL)
                .long(ARG_BACKEND_URL)
                .help("Auth backend base URL, example: http://api.internal:8080")
                .long_help(
                    "Auth backend base URL. The auth type, current user and provider authorize URLs are fetched from it on every login page request.",
                )
                .env("AUTHGATE_BACKEND_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_BACKEND_TIMEOUT)
                .long(ARG_BACKEND_TIMEOUT)
                .help("Timeout in seconds for each backend request")
                .default_value("10")
                .env("AUTHGATE_BACKEND_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
