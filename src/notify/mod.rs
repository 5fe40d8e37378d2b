//! Time-boxed presentation of workflow outcome messages.
//!
//! The workflows decide *what* message to show; this channel only holds the
//! currently visible one and clears it after its TTL. Display is a
//! projection of [`NotificationChannel::current`].

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

/// How long a notification stays visible unless replaced first.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

struct Slot {
    current: Option<Notification>,
    generation: u64,
}

/// Shows one notification at a time. A newer message replaces the current one
/// and restarts the clock; an expired message clears itself.
///
/// Must be used from within a Tokio runtime; expiry runs on a spawned timer.
#[derive(Clone)]
pub struct NotificationChannel {
    state: Arc<Mutex<Slot>>,
    ttl: Duration,
}

impl NotificationChannel {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(Slot {
                current: None,
                generation: 0,
            })),
            ttl,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(Severity::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(Severity::Error, message.into());
    }

    /// Currently visible notification, if any.
    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.state.lock().ok().and_then(|slot| slot.current.clone())
    }

    fn show(&self, severity: Severity, message: String) {
        let generation = {
            let Ok(mut slot) = self.state.lock() else {
                return;
            };
            slot.generation += 1;
            slot.current = Some(Notification { severity, message });
            slot.generation
        };

        let state = Arc::clone(&self.state);
        let ttl = self.ttl;
        tokio::spawn(async move {
            sleep(ttl).await;
            if let Ok(mut slot) = state.lock() {
                // A newer notification restarted the clock; leave it alone.
                if slot.generation == generation {
                    slot.current = None;
                }
            }
        });
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::yield_now;

    #[tokio::test(start_paused = true)]
    async fn notification_clears_after_ttl() {
        let channel = NotificationChannel::new(Duration::from_secs(5));
        channel.error("Username not specified.");
        assert_eq!(
            channel.current().map(|n| n.message),
            Some("Username not specified.".to_string())
        );

        sleep(Duration::from_secs(6)).await;
        yield_now().await;
        assert_eq!(channel.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_notification_replaces_and_restarts_the_clock() {
        let channel = NotificationChannel::new(Duration::from_secs(5));
        channel.error("first");

        sleep(Duration::from_secs(3)).await;
        channel.success("second");

        // The first timer fires here, but must not clear the newer message.
        sleep(Duration::from_secs(3)).await;
        yield_now().await;
        assert_eq!(
            channel.current(),
            Some(Notification {
                severity: Severity::Success,
                message: "second".to_string(),
            })
        );

        sleep(Duration::from_secs(3)).await;
        yield_now().await;
        assert_eq!(channel.current(), None);
    }
}
