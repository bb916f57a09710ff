//! # Authgate (login landing flow)
//!
//! `authgate` decides what happens when a visitor lands on the login page.
//! Given the deployment's configured auth mode and the visitor's current
//! session, the visitor is either sent straight on (auth disabled, or already
//! signed in), handed to an external identity provider, or shown the in-page
//! sign-in UI.
//!
//! ## Flow resolution
//!
//! The auth-mode and session lookups run concurrently; the authorize URL is
//! only requested afterwards, and only when the visitor actually needs to sign
//! in. Every lookup is allowed to fail: failures degrade the outcome (no mode,
//! no live session, no provider button) and never turn into an error page.
//!
//! - **Disabled auth** always wins and redirects to the default landing page.
//! - **Lazy expiration:** sessions are checked against their expiry at read
//!   time; inactive or expired sessions count as no session at all.
//! - **Fail towards login:** a failed session lookup shows the login page, it
//!   never skips it.
//!
//! The decision itself is a pure function returning a tagged [`flow::Action`];
//! the HTTP handler performs the redirect as its last step.

pub mod backend;
pub mod cli;
pub mod flow;
pub mod gate;
pub mod render;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
