use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

pub type NotificationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Instant,
}

/// Transient status messages, expired by [`NotificationQueue::expire`] on each tick.
///
/// Ids grow monotonically, so map order is creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationQueue {
    entries: BTreeMap<NotificationId, Notification>,
    next_id: NotificationId,
    ttl: Duration,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::with_ttl(NOTIFICATION_TTL)
    }
}

impl NotificationQueue {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
            ttl,
        }
    }

    pub fn push(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        now: Instant,
    ) -> NotificationId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            id,
            Notification {
                id,
                message: message.into(),
                kind,
                created_at: now,
            },
        );
        id
    }

    /// Removes the notification; unknown ids are ignored.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Drops every notification whose lifetime has elapsed at `now`.
    /// Returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.created_at) < ttl);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
