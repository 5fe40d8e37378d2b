//! Send-code / verify-code workflow state machine.
//!
//! The machine owns the flow state; rendering merely projects the
//! [`Control`]s. Scoped to one mounted page: created fresh per visit,
//! discarded on navigation away.

use crate::error::ErrorKind;
use crate::notify::NotificationChannel;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use tracing::warn;

/// Backend operations for the verification flow.
#[async_trait]
pub trait VerificationGateway: Send + Sync {
    /// Ask the backend to send a one-time code. Delivery is asynchronous.
    async fn request_code(&self) -> Result<(), ErrorKind>;

    /// Submit the entered code for verification.
    async fn submit_code(&self, code: &str) -> Result<(), ErrorKind>;
}

/// Workflow phase.
///
/// `Failed` keeps the code-entry control in its pre-submit condition so the
/// user may retry; the next submit takes the same path as from `CodeSent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    CodeSent,
    Verifying,
    Verified,
    Failed(ErrorKind),
}

/// Enabled flag and label for one UI control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub enabled: bool,
    pub label: &'static str,
}

pub const SEND_LABEL: &str = "Send verification code";
pub const SENT_LABEL: &str = "Code sent";
pub const VERIFY_LABEL: &str = "Verify";
pub const VERIFYING_LABEL: &str = "Verifying";
pub const VERIFIED_LABEL: &str = "Verified";

/// Outcome of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(ErrorKind),
    /// Dropped without a backend call: no code of the expected shape, or the
    /// machine is not in an enabled code-entry state.
    NotReady,
}

pub struct VerificationMachine {
    gateway: Arc<dyn VerificationGateway>,
    notices: NotificationChannel,
    phase: Phase,
    code: String,
}

impl VerificationMachine {
    #[must_use]
    pub fn new(gateway: Arc<dyn VerificationGateway>, notices: NotificationChannel) -> Self {
        Self {
            gateway,
            notices,
            phase: Phase::Idle,
            code: String::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Record the code as the user types it.
    pub fn set_code(&mut self, code: &str) {
        self.code = code.trim().to_string();
    }

    /// Send-code control projection.
    #[must_use]
    pub fn send_control(&self) -> Control {
        match self.phase {
            Phase::Idle => Control {
                enabled: true,
                label: SEND_LABEL,
            },
            _ => Control {
                enabled: false,
                label: SENT_LABEL,
            },
        }
    }

    /// Code-entry control projection.
    #[must_use]
    pub fn submit_control(&self) -> Control {
        match self.phase {
            Phase::CodeSent | Phase::Failed(_) => Control {
                enabled: valid_code(&self.code),
                label: VERIFY_LABEL,
            },
            Phase::Verifying => Control {
                enabled: false,
                label: VERIFYING_LABEL,
            },
            Phase::Verified => Control {
                enabled: false,
                label: VERIFIED_LABEL,
            },
            Phase::Idle => Control {
                enabled: false,
                label: VERIFY_LABEL,
            },
        }
    }

    /// Request a one-time code.
    ///
    /// Advances to `CodeSent` even when the backend call rejects; delivery is
    /// best-effort and asynchronous, so the send step is fire-and-forget.
    pub async fn send(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }

        if let Err(kind) = self.gateway.request_code().await {
            warn!("send-code request rejected: {kind}");
        }

        self.phase = Phase::CodeSent;
        true
    }

    /// Submit the entered code.
    ///
    /// Single-flight: the enabled flag gates this, so a submit while one is
    /// pending, or without a numeric code, is dropped.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.submit_control().enabled {
            return SubmitOutcome::NotReady;
        }

        let code = self.code.clone();
        self.phase = Phase::Verifying;

        match self.gateway.submit_code(&code).await {
            Ok(()) => {
                self.phase = Phase::Verified;
                self.notices.success("Your email has been verified.");
                SubmitOutcome::Accepted
            }
            Err(kind) => {
                self.notices.error(kind.message());
                self.phase = Phase::Failed(kind.clone());
                SubmitOutcome::Rejected(kind)
            }
        }
    }
}

/// A code of the expected shape: all digits, at least one.
#[must_use]
pub fn valid_code(code: &str) -> bool {
    Regex::new(r"^[0-9]+$").map_or(false, |re| re.is_match(code))
}
