use clap::{Arg, ArgMatches, Command};

pub const ARG_DEFAULT_LANDING: &str = "default-landing";
pub const ARG_VERIFICATION_PATH: &str = "verification-path";
pub const ARG_SIGNUP_PATH: &str = "signup-path";

#[derive(Debug, Clone)]
pub struct Options {
    pub default_landing: String,
    pub verification_path: String,
    pub signup_path: String,
}

impl Options {
    /// Parse redirect destinations from matches.
    ///
    /// # Errors
    /// Returns an error if a destination is empty.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let get = |id: &str| -> anyhow::Result<String> {
            matches
                .get_one::<String>(id)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        Ok(Self {
            default_landing: get(ARG_DEFAULT_LANDING)?,
            verification_path: get(ARG_VERIFICATION_PATH)?,
            signup_path: get(ARG_SIGNUP_PATH)?,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DEFAULT_LANDING)
                .long(ARG_DEFAULT_LANDING)
                .help("Where signed-in visitors (or everyone, when auth is disabled) are sent")
                .default_value("/")
                .env("AUTHGATE_DEFAULT_LANDING"),
        )
        .arg(
            Arg::new(ARG_VERIFICATION_PATH)
                .long(ARG_VERIFICATION_PATH)
                .help("Where signed-in but unverified visitors are sent")
                .default_value("/auth/waiting-on-verification")
                .env("AUTHGATE_VERIFICATION_PATH"),
        )
        .arg(
            Arg::new(ARG_SIGNUP_PATH)
                .long(ARG_SIGNUP_PATH)
                .help("Signup page linked from the email/password form")
                .default_value("/auth/signup")
                .env("AUTHGATE_SIGNUP_PATH"),
        )
}
