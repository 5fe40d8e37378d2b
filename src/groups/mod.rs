//! Administrative group-membership mutation workflow.
//!
//! Flow Overview:
//! 1) Seed the visible-label table from the user directory listing.
//! 2) `mutate` issues the assignment or revocation call; duplicates for a
//!    pending (username, action) control are dropped, not queued.
//! 3) Pessimistic commit: the visible label changes only after the backend
//!    confirms; a rejection leaves it exactly as before.

use crate::error::ErrorKind;
use crate::notify::NotificationChannel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const ADMIN_GROUP: &str = "admin_group";
pub const MANAGE_PRODUCT_GROUP: &str = "manage_product_group";

/// Row shape of the user directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub gender: String,
}

/// Visible label for a group membership.
#[must_use]
pub fn visible_label(group: Option<&str>) -> String {
    match group {
        Some(ADMIN_GROUP) => "Admin".to_string(),
        Some(MANAGE_PRODUCT_GROUP) => "Manage Products".to_string(),
        Some(other) => other.to_string(),
        None => "None".to_string(),
    }
}

/// One group reassignment. `to_group: None` encodes revocation. Ephemeral:
/// exists only for the lifetime of one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMutationRequest {
    pub username: String,
    pub from_group: Option<String>,
    pub to_group: Option<String>,
}

/// Backend operations for group mutation.
#[async_trait]
pub trait GroupGateway: Send + Sync {
    async fn assign_group(&self, group: &str, username: &str) -> Result<(), ErrorKind>;
    async fn revoke_group(&self, group: &str, username: &str) -> Result<(), ErrorKind>;
}

/// Result of one mutation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Backend confirmed; carries the new visible label for the user.
    Committed(String),
    Rejected(ErrorKind),
    /// Dropped: a request for the same control is already in flight.
    InFlight,
    /// Nothing to do (revocation with no current group).
    Noop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ActionKind {
    Assign,
    Revoke,
}

pub struct GroupMutationCoordinator {
    gateway: Arc<dyn GroupGateway>,
    notices: NotificationChannel,
    in_flight: Mutex<HashSet<(String, ActionKind)>>,
    groups: Mutex<HashMap<String, Option<String>>>,
}

impl GroupMutationCoordinator {
    #[must_use]
    pub fn new(gateway: Arc<dyn GroupGateway>, notices: NotificationChannel) -> Self {
        Self {
            gateway,
            notices,
            in_flight: Mutex::new(HashSet::new()),
            groups: Mutex::new(HashMap::new()),
        }
    }

    /// Seed the visible-label table from a user directory listing.
    pub fn seed(&self, users: &[UserRecord]) {
        if let Ok(mut groups) = self.groups.lock() {
            for user in users {
                groups.insert(user.username.clone(), user.group.clone());
            }
        }
    }

    /// Visible label for a user, from the last committed state.
    #[must_use]
    pub fn visible_group(&self, username: &str) -> String {
        let group = self
            .groups
            .lock()
            .ok()
            .and_then(|groups| groups.get(username).cloned())
            .flatten();
        visible_label(group.as_deref())
    }

    /// Apply one reassignment with pessimistic commit semantics.
    pub async fn mutate(&self, request: GroupMutationRequest) -> MutationOutcome {
        let action = if request.to_group.is_some() {
            ActionKind::Assign
        } else {
            ActionKind::Revoke
        };
        let key = (request.username.clone(), action);

        if !self.begin(&key) {
            return MutationOutcome::InFlight;
        }

        let outcome = self.run(&request).await;
        self.finish(&key);

        match &outcome {
            MutationOutcome::Committed(label) => {
                self.notices.success(format!("Group changed to {label}."));
            }
            MutationOutcome::Rejected(kind) => {
                self.notices.error(kind.message());
            }
            MutationOutcome::InFlight | MutationOutcome::Noop => {}
        }

        outcome
    }

    async fn run(&self, request: &GroupMutationRequest) -> MutationOutcome {
        match &request.to_group {
            Some(group) => match self.gateway.assign_group(group, &request.username).await {
                Ok(()) => {
                    MutationOutcome::Committed(self.commit(&request.username, Some(group.clone())))
                }
                Err(kind) => MutationOutcome::Rejected(kind),
            },
            None => {
                let Some(current) = self.current_group(request) else {
                    return MutationOutcome::Noop;
                };
                match self.gateway.revoke_group(&current, &request.username).await {
                    Ok(()) => MutationOutcome::Committed(self.commit(&request.username, None)),
                    Err(kind) => MutationOutcome::Rejected(kind),
                }
            }
        }
    }

    /// Group the revocation call targets: the request's `from_group`, or the
    /// last committed membership.
    fn current_group(&self, request: &GroupMutationRequest) -> Option<String> {
        request.from_group.clone().or_else(|| {
            self.groups
                .lock()
                .ok()
                .and_then(|groups| groups.get(&request.username).cloned())
                .flatten()
        })
    }

    /// Record the confirmed membership and return the new visible label.
    fn commit(&self, username: &str, group: Option<String>) -> String {
        let label = visible_label(group.as_deref());
        if let Ok(mut groups) = self.groups.lock() {
            groups.insert(username.to_string(), group);
        }
        label
    }

    fn begin(&self, key: &(String, ActionKind)) -> bool {
        self.in_flight
            .lock()
            .map_or(false, |mut in_flight| in_flight.insert(key.clone()))
    }

    fn finish(&self, key: &(String, ActionKind)) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;
    use tokio::task::yield_now;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Assign(String, String),
        Revoke(String, String),
    }

    struct StubGateway {
        result: Mutex<Result<(), ErrorKind>>,
        calls: Mutex<Vec<Call>>,
        hold: Option<Arc<Notify>>,
        started: AtomicUsize,
    }

    impl StubGateway {
        fn with_result(result: Result<(), ErrorKind>) -> Self {
            Self {
                result: Mutex::new(result),
                calls: Mutex::new(Vec::new()),
                hold: None,
                started: AtomicUsize::new(0),
            }
        }

        fn held(release: Arc<Notify>) -> Self {
            Self {
                result: Mutex::new(Ok(())),
                calls: Mutex::new(Vec::new()),
                hold: Some(release),
                started: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        async fn record(&self, call: Call) -> Result<(), ErrorKind> {
            self.calls.lock().unwrap().push(call);
            self.started.fetch_add(1, Ordering::SeqCst);
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            self.result.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GroupGateway for StubGateway {
        async fn assign_group(&self, group: &str, username: &str) -> Result<(), ErrorKind> {
            self.record(Call::Assign(group.to_string(), username.to_string()))
                .await
        }

        async fn revoke_group(&self, group: &str, username: &str) -> Result<(), ErrorKind> {
            self.record(Call::Revoke(group.to_string(), username.to_string()))
                .await
        }
    }

    fn seeded(gateway: Arc<StubGateway>) -> GroupMutationCoordinator {
        let coordinator =
            GroupMutationCoordinator::new(gateway, NotificationChannel::default());
        coordinator.seed(&[
            UserRecord {
                username: "user1".to_string(),
                group: Some(ADMIN_GROUP.to_string()),
                status: "CONFIRMED".to_string(),
                gender: "female".to_string(),
            },
            UserRecord {
                username: "user2".to_string(),
                group: None,
                status: "CONFIRMED".to_string(),
                gender: "male".to_string(),
            },
        ]);
        coordinator
    }

    fn revoke(username: &str, from: &str) -> GroupMutationRequest {
        GroupMutationRequest {
            username: username.to_string(),
            from_group: Some(from.to_string()),
            to_group: None,
        }
    }

    fn assign(username: &str, to: &str) -> GroupMutationRequest {
        GroupMutationRequest {
            username: username.to_string(),
            from_group: None,
            to_group: Some(to.to_string()),
        }
    }

    #[tokio::test]
    async fn revocation_targets_the_current_group() {
        let gateway = Arc::new(StubGateway::with_result(Ok(())));
        let coordinator = seeded(gateway.clone());

        let outcome = coordinator.mutate(revoke("user1", ADMIN_GROUP)).await;

        assert_eq!(outcome, MutationOutcome::Committed("None".to_string()));
        assert_eq!(
            gateway.calls(),
            vec![Call::Revoke("admin_group".to_string(), "user1".to_string())]
        );
        assert_eq!(coordinator.visible_group("user1"), "None");
    }

    #[tokio::test]
    async fn assignment_commits_the_new_label() {
        let gateway = Arc::new(StubGateway::with_result(Ok(())));
        let coordinator = seeded(gateway.clone());

        let outcome = coordinator
            .mutate(assign("user1", MANAGE_PRODUCT_GROUP))
            .await;

        assert_eq!(
            outcome,
            MutationOutcome::Committed("Manage Products".to_string())
        );
        assert_eq!(
            gateway.calls(),
            vec![Call::Assign(
                "manage_product_group".to_string(),
                "user1".to_string()
            )]
        );
        assert_eq!(coordinator.visible_group("user1"), "Manage Products");
    }

    #[tokio::test]
    async fn rejection_leaves_the_label_untouched() {
        let gateway = Arc::new(StubGateway::with_result(Err(ErrorKind::EmptyUsername)));
        let notices = NotificationChannel::default();
        let coordinator = GroupMutationCoordinator::new(gateway, notices.clone());
        coordinator.seed(&[UserRecord {
            username: "user1".to_string(),
            group: Some(ADMIN_GROUP.to_string()),
            status: "CONFIRMED".to_string(),
            gender: "female".to_string(),
        }]);

        let outcome = coordinator.mutate(revoke("user1", ADMIN_GROUP)).await;

        assert_eq!(outcome, MutationOutcome::Rejected(ErrorKind::EmptyUsername));
        assert_eq!(coordinator.visible_group("user1"), "Admin");
        assert_eq!(
            notices.current().map(|n| n.message),
            Some("Username not specified.".to_string())
        );
    }

    #[tokio::test]
    async fn revocation_without_a_current_group_is_a_noop() {
        let gateway = Arc::new(StubGateway::with_result(Ok(())));
        let coordinator = seeded(gateway.clone());

        let outcome = coordinator
            .mutate(GroupMutationRequest {
                username: "user2".to_string(),
                from_group: None,
                to_group: None,
            })
            .await;

        assert_eq!(outcome, MutationOutcome::Noop);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn duplicate_submission_while_pending_is_dropped() {
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(StubGateway::held(release.clone()));
        let coordinator = Arc::new(seeded(gateway.clone()));

        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.mutate(revoke("user1", ADMIN_GROUP)).await })
        };

        // Let the first request reach the backend and park there.
        while gateway.started.load(Ordering::SeqCst) == 0 {
            yield_now().await;
        }

        let second = coordinator.mutate(revoke("user1", ADMIN_GROUP)).await;
        assert_eq!(second, MutationOutcome::InFlight);

        release.notify_one();
        let first = first.await.unwrap();
        assert_eq!(first, MutationOutcome::Committed("None".to_string()));

        // Only the first submission reached the backend.
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn assign_and_revoke_are_distinct_controls() {
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(StubGateway::held(release.clone()));
        let coordinator = Arc::new(seeded(gateway.clone()));

        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .mutate(assign("user2", MANAGE_PRODUCT_GROUP))
                    .await
            })
        };

        while gateway.started.load(Ordering::SeqCst) == 0 {
            yield_now().await;
        }

        // A revoke for another user is its own control and proceeds.
        let other = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.mutate(revoke("user1", ADMIN_GROUP)).await })
        };

        while gateway.started.load(Ordering::SeqCst) < 2 {
            yield_now().await;
        }

        release.notify_waiters();
        assert_eq!(
            first.await.unwrap(),
            MutationOutcome::Committed("Manage Products".to_string())
        );
        assert_eq!(
            other.await.unwrap(),
            MutationOutcome::Committed("None".to_string())
        );
    }

    #[test]
    fn labels_cover_known_groups() {
        assert_eq!(visible_label(Some(ADMIN_GROUP)), "Admin");
        assert_eq!(visible_label(Some(MANAGE_PRODUCT_GROUP)), "Manage Products");
        assert_eq!(visible_label(Some("beta_group")), "beta_group");
        assert_eq!(visible_label(None), "None");
    }
}
