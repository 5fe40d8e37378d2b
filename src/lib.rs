//! # Vetrina (Storefront Session Gate & Account Workflows)
//!
//! `vetrina` is the session-authorization core of a storefront/admin web
//! client. Page rendering itself lives elsewhere; this crate decides what a
//! page is allowed to do and drives the two interactive account workflows.
//!
//! ## Route Gate
//!
//! Every server-rendered page goes through one gate evaluation before it may
//! render: probe the session, fall back to a single refresh attempt when the
//! probe fails, and map the combined result onto the route's static policy.
//! The outcome is either `{"props": …}` (render) or a redirect to `/?<flag>`.
//! Transport failures never surface as error pages.
//!
//! - **Home is never gated.** The landing page always renders; identity and
//!   catalog data are loaded after mount, best-effort.
//! - **One refresh per evaluation.** A second refresh failure is terminal for
//!   that evaluation; there is no retry loop.
//!
//! ## Account Workflows
//!
//! Two client-side workflows issue their own backend calls and report
//! outcomes through a time-boxed notification channel:
//!
//! - **Verification**: send a one-time code, then verify it. The send step is
//!   fire-and-forget; the submit step is single-flight and re-armed after a
//!   code mismatch.
//! - **Group mutation**: reassign a user's access group with pessimistic
//!   commit. The visible label changes only after the backend confirms, and
//!   duplicate submissions for a pending control are dropped.
//!
//! Backend exception identifiers form a closed [`error::ErrorKind`]
//! enumeration with a fixed message dictionary; unmapped identifiers stay
//! loudly visible instead of succeeding silently.

pub mod backend;
pub mod cli;
pub mod error;
pub mod gate;
pub mod groups;
pub mod home;
pub mod notify;
pub mod session;
pub mod verification;
pub mod vetrina;

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
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
