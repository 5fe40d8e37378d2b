//! Per-route authorization gate.
//!
//! Flow Overview:
//! 1) Probe the session with the forwarded cookie, if any.
//! 2) On probe failure, attempt exactly one refresh; its outcome never
//!    changes the decision.
//! 3) Map route policy and probe result onto allow-or-redirect.
//!
//! Transport failures never escape a gate evaluation as errors; every
//! evaluation degrades to an outcome from the policy table.

use crate::session::{AuthenticatedResult, ForwardedCookie, IdentityGateway};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Pages subject to a gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Users,
    Verify,
    Home,
}

/// Static access policy of a route, unrelated to request data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePolicy {
    Public,
    LoginOnly,
    AdminOnly,
    UnverifiedOnly,
}

impl Route {
    #[must_use]
    pub const fn policy(self) -> RoutePolicy {
        match self {
            Self::Home => RoutePolicy::Public,
            Self::Login => RoutePolicy::LoginOnly,
            Self::Users => RoutePolicy::AdminOnly,
            Self::Verify => RoutePolicy::UnverifiedOnly,
        }
    }
}

/// One-shot flag carried in the redirect destination query, read client-side
/// to drive a notification after the redirect lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectFlag {
    Logged,
    Unauthorized,
    Verified,
}

impl RedirectFlag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Logged => "logged",
            Self::Unauthorized => "unauthorized",
            Self::Verified => "verified",
        }
    }

    /// Destination of the redirect, always of the form `/?<flag>`.
    #[must_use]
    pub fn destination(self) -> String {
        format!("/?{}", self.as_str())
    }

    /// One-shot message shown after following the redirect.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Logged => "You are already logged in.",
            Self::Unauthorized => "You are not authorized to perform this action.",
            Self::Verified => "Your email is already verified.",
        }
    }
}

/// Decision of one gate evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Render the page with these props.
    Allow(Map<String, Value>),
    /// Send the client to `/?<flag>` instead of rendering.
    Redirect { flag: RedirectFlag, permanent: bool },
}

impl GateOutcome {
    #[must_use]
    pub fn allow() -> Self {
        Self::Allow(Map::new())
    }

    #[must_use]
    pub const fn redirect(flag: RedirectFlag) -> Self {
        Self::Redirect {
            flag,
            permanent: false,
        }
    }

    /// Server-side rendering document: `{"props": …}` or `{"redirect": …}`.
    #[must_use]
    pub fn to_document(&self) -> Value {
        match self {
            Self::Allow(props) => json!({ "props": props }),
            Self::Redirect { flag, permanent } => json!({
                "redirect": {
                    "destination": flag.destination(),
                    "permanent": permanent,
                }
            }),
        }
    }
}

/// Route gate bound to an identity gateway.
pub struct Gate {
    gateway: Arc<dyn IdentityGateway>,
}

impl Gate {
    #[must_use]
    pub fn new(gateway: Arc<dyn IdentityGateway>) -> Self {
        Self { gateway }
    }

    /// Evaluate one route before it is allowed to render.
    ///
    /// Public routes never probe. Gated routes probe once and, on failure,
    /// attempt exactly one refresh before falling back to the anonymous row
    /// of the policy table.
    pub async fn evaluate(&self, route: Route, cookie: Option<&ForwardedCookie>) -> GateOutcome {
        if route.policy() == RoutePolicy::Public {
            return GateOutcome::allow();
        }

        match self.gateway.probe(cookie).await {
            Ok(identity) => authenticated_outcome(route, &identity),
            Err(_) => {
                // One attempt only; a second failure is terminal for this evaluation.
                if self.gateway.refresh(cookie).await.is_err() {
                    debug!("session refresh failed during gate evaluation");
                }
                anonymous_outcome(route)
            }
        }
    }
}

/// Outcome row for a successful probe.
#[must_use]
pub fn authenticated_outcome(route: Route, identity: &AuthenticatedResult) -> GateOutcome {
    match route.policy() {
        RoutePolicy::Public => GateOutcome::allow(),
        RoutePolicy::LoginOnly => GateOutcome::redirect(RedirectFlag::Logged),
        RoutePolicy::AdminOnly => {
            if identity.admin {
                GateOutcome::allow()
            } else {
                GateOutcome::redirect(RedirectFlag::Unauthorized)
            }
        }
        RoutePolicy::UnverifiedOnly => {
            if identity.email_verified {
                GateOutcome::redirect(RedirectFlag::Verified)
            } else {
                GateOutcome::allow()
            }
        }
    }
}

/// Outcome row for an unknown identity (probe failed, refresh already attempted).
#[must_use]
pub fn anonymous_outcome(route: Route) -> GateOutcome {
    match route.policy() {
        RoutePolicy::Public | RoutePolicy::LoginOnly | RoutePolicy::UnverifiedOnly => {
            GateOutcome::allow()
        }
        RoutePolicy::AdminOnly => GateOutcome::redirect(RedirectFlag::Unauthorized),
    }
}
