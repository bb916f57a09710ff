pub mod backend;
pub mod logging;
pub mod routes;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("authgate")
        .about("Login landing flow resolver")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("AUTHGATE_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = backend::with_args(command);
    let command = routes::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND_URL: &str = "http://api.internal:8080";

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "authgate");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Login landing flow resolver".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_args() {
        temp_env::with_vars_unset(
            [
                "AUTHGATE_PORT",
                "AUTHGATE_BACKEND_URL",
                "AUTHGATE_BACKEND_TIMEOUT",
                "AUTHGATE_DEFAULT_LANDING",
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "authgate",
                    "--port",
                    "9090",
                    "--backend-url",
                    BACKEND_URL,
                    "--backend-timeout",
                    "3",
                    "--default-landing",
                    "/chat",
                ]);

                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(9090));
                assert_eq!(
                    matches.get_one::<String>(backend::ARG_BACKEND_URL).cloned(),
                    Some(BACKEND_URL.to_string())
                );
                assert_eq!(
                    matches.get_one::<u64>(backend::ARG_BACKEND_TIMEOUT).copied(),
                    Some(3)
                );
                assert_eq!(
                    matches.get_one::<String>(routes::ARG_DEFAULT_LANDING).cloned(),
                    Some("/chat".to_string())
                );
            },
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(
            [
                "AUTHGATE_PORT",
                "AUTHGATE_BACKEND_TIMEOUT",
                "AUTHGATE_DEFAULT_LANDING",
                "AUTHGATE_VERIFICATION_PATH",
                "AUTHGATE_SIGNUP_PATH",
            ],
            || {
                let matches =
                    new().get_matches_from(vec!["authgate", "--backend-url", BACKEND_URL]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
                assert_eq!(
                    matches.get_one::<u64>(backend::ARG_BACKEND_TIMEOUT).copied(),
                    Some(10)
                );
                assert_eq!(
                    matches.get_one::<String>(routes::ARG_DEFAULT_LANDING).cloned(),
                    Some("/".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>(routes::ARG_VERIFICATION_PATH)
                        .cloned(),
                    Some("/auth/waiting-on-verification".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(routes::ARG_SIGNUP_PATH).cloned(),
                    Some("/auth/signup".to_string())
                );
            },
        );
    }

    #[test]
    fn test_missing_backend_url() {
        temp_env::with_vars_unset(["AUTHGATE_BACKEND_URL"], || {
            let result = new().try_get_matches_from(vec!["authgate"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = new().try_get_matches_from(vec![
            "authgate",
            "--backend-url",
            BACKEND_URL,
            "--backend-timeout",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("AUTHGATE_BACKEND_URL", Some(BACKEND_URL)),
                ("AUTHGATE_PORT", Some("443")),
                ("AUTHGATE_VERIFICATION_PATH", Some("/verify")),
                ("AUTHGATE_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["authgate"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(backend::ARG_BACKEND_URL).cloned(),
                    Some(BACKEND_URL.to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>(routes::ARG_VERIFICATION_PATH)
                        .cloned(),
                    Some("/verify".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("AUTHGATE_LOG_LEVEL", Some(level)),
                    ("AUTHGATE_BACKEND_URL", Some(BACKEND_URL)),
                ],
                || {
                    let matches = new().get_matches_from(vec!["authgate"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        Some(u8::try_from(index).unwrap_or_default())
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars([("AUTHGATE_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "authgate".to_string(),
                    "--backend-url".to_string(),
                    BACKEND_URL.to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(u8::try_from(index).unwrap_or_default())
                );
            });
        }
    }
}
