//! Dismissible notifications for errors the user should see.

use crate::errors::Error;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Kind of failure being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationKind {
    /// A backend call failed; trying again later may work
    RemoteFailure,
    /// The operation was refused (invalid transition, missing permission, bad input)
    Refused,
}

/// One reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Ordered list of notifications that have not been dismissed.
#[derive(Debug, Default)]
pub struct Notifications {
    next_id: u64,
    items: Vec<Notification>,
}

impl Notifications {
    /// Records `error` and returns the new notification's id.
    pub fn report(&mut self, error: &Error) -> u64 {
        let kind = if error.is_remote() {
            NotificationKind::RemoteFailure
        } else {
            NotificationKind::Refused
        };
        self.push(kind, error.to_string())
    }

    /// Adds a notification and returns its id.
    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.items.push(Notification {
            id: self.next_id,
            kind,
            message: message.into(),
            created_at: Utc::now(),
        });
        self.next_id
    }

    /// Removes a notification. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    #[must_use]
    pub fn list(&self) -> &[Notification] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProposalState;

    #[test]
    fn test_report_and_dismiss() {
        let mut notifications = Notifications::default();
        let remote = notifications.report(&Error::remote("add_favorite", "timeout"));
        let refused = notifications.report(&Error::InvalidTransition {
            proposal_id: 6,
            from: ProposalState::Approved,
            to: ProposalState::Approved,
        });
        assert_ne!(remote, refused);

        let kinds: Vec<_> = notifications.list().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::RemoteFailure, NotificationKind::Refused]
        );

        assert!(notifications.dismiss(remote));
        assert!(!notifications.dismiss(remote));
        assert_eq!(notifications.list().len(), 1);
        assert_eq!(notifications.list()[0].id, refused);

        notifications.clear();
        assert!(notifications.list().is_empty());
    }
}
