//! Session identity types shared by the gate and the backend client.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Identity snapshot produced by the probe.
///
/// Absence of a snapshot (a failed probe) means "identity unknown", which is
/// distinct from a snapshot with every flag false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthenticatedResult {
    pub admin: bool,
    pub email_verified: bool,
    pub manage_products: bool,
    pub username: String,
    pub tokens: HashMap<String, String>,
}

/// The probe failed: not authenticated now. No recoverable detail is carried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("identity probe failed")]
pub struct ProbeFailure;

/// The refresh attempt failed: the session is truly expired.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("session refresh failed")]
pub struct RefreshFailure;

/// Cookie header forwarded verbatim on server-rendered requests.
///
/// Server-rendered evaluations have no ambient cookie jar, so the header is
/// carried explicitly. Browser-context calls pass `None` and leave
/// credentials to the transport.
#[derive(Clone)]
pub struct ForwardedCookie(SecretString);

impl ForwardedCookie {
    #[must_use]
    pub fn new(header: &str) -> Self {
        Self(SecretString::from(header.to_string()))
    }

    /// Raw header value; only exposed at the request-construction site.
    #[must_use]
    pub fn header_value(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ForwardedCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ForwardedCookie(..)")
    }
}

/// Identity operations the gate depends on.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Determine current identity without side effects.
    async fn probe(
        &self,
        cookie: Option<&ForwardedCookie>,
    ) -> Result<AuthenticatedResult, ProbeFailure>;

    /// Attempt to extend the session after a probe failure. Never re-derives
    /// identity itself; callers re-probe if they need an updated snapshot.
    async fn refresh(&self, cookie: Option<&ForwardedCookie>) -> Result<(), RefreshFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_result_from_camel_case_payload() {
        let identity: AuthenticatedResult = serde_json::from_str(
            r#"{
                "admin": true,
                "emailVerified": false,
                "manageProducts": true,
                "username": "user1",
                "tokens": {"access": "a", "refresh": "r"}
            }"#,
        )
        .unwrap();

        assert!(identity.admin);
        assert!(!identity.email_verified);
        assert!(identity.manage_products);
        assert_eq!(identity.username, "user1");
        assert_eq!(identity.tokens.get("access").map(String::as_str), Some("a"));
    }

    #[test]
    fn authenticated_result_missing_fields_default_to_false() {
        let identity: AuthenticatedResult =
            serde_json::from_str(r#"{"username": "user1"}"#).unwrap();

        assert!(!identity.admin);
        assert!(!identity.email_verified);
        assert!(identity.tokens.is_empty());
    }

    #[test]
    fn forwarded_cookie_keeps_value_out_of_debug() {
        let cookie = ForwardedCookie::new("session=secret-token");
        assert_eq!(format!("{cookie:?}"), "ForwardedCookie(..)");
        assert_eq!(cookie.header_value(), "session=secret-token");
    }
}
