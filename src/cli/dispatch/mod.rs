//! Map parsed CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{backend, routes, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let backend_opts = backend::Options::parse(matches)?;
    let routes_opts = routes::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        backend_url: backend_opts.url,
        backend_timeout_seconds: backend_opts.timeout_seconds,
        default_landing: routes_opts.default_landing,
        verification_path: routes_opts.verification_path,
        signup_path: routes_opts.signup_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn server_action_from_args() {
        temp_env::with_vars_unset(
            ["AUTHGATE_PORT", "AUTHGATE_DEFAULT_LANDING", "AUTHGATE_SIGNUP_PATH"],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "authgate",
                    "--backend-url",
                    "https://api.example.com/api",
                    "--signup-path",
                    "/register",
                ]);
                let action = handler(&matches);
                assert!(action.is_ok());
                if let Ok(Action::Server(args)) = action {
                    assert_eq!(args.port, 8080);
                    assert_eq!(args.backend_url, "https://api.example.com/api");
                    assert_eq!(args.default_landing, "/");
                    assert_eq!(args.signup_path, "/register");
                }
            },
        );
    }

    #[test]
    fn rejects_non_http_backend() {
        let matches = commands::new().get_matches_from(vec![
            "authgate",
            "--backend-url",
            "ftp://api.example.com",
        ]);
        let err = handler(&matches).err().map(|e| e.to_string());
        assert!(err.is_some_and(|e| e.contains("unsupported scheme ftp")));
    }

    #[test]
    fn rejects_empty_destination() {
        let matches = commands::new().get_matches_from(vec![
            "authgate",
            "--backend-url",
            "http://api.example.com",
            "--default-landing",
            " ",
        ]);
        let err = handler(&matches).err().map(|e| e.to_string());
        assert!(err.is_some_and(|e| e.contains("--default-landing")));
    }
}
