//! Short-lived success/error messages. Each entry expires on its own clock.

use std::collections::VecDeque;

pub const DEFAULT_TTL_MS: i64 = 3000;
pub const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Millisecond timestamp of creation, bumped to stay unique.
    pub id: i64,
    pub message: String,
    pub kind: NoticeKind,
    pub expires_at: i64,
}

#[derive(Debug, Clone)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
    ttl_ms: i64,
    /// 0 means unbounded.
    capacity: usize,
    last_id: i64,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_MS, DEFAULT_CAPACITY)
    }
}

impl NotificationQueue {
    pub fn new(ttl_ms: i64, capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            ttl_ms,
            capacity,
            last_id: i64::MIN,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: NoticeKind, now_ms: i64) -> i64 {
        let id = now_ms.max(self.last_id.saturating_add(1));
        self.last_id = id;
        self.entries.push_back(Notification {
            id,
            message: message.into(),
            kind,
            expires_at: now_ms + self.ttl_ms,
        });
        if self.capacity > 0 {
            while self.entries.len() > self.capacity {
                self.entries.pop_front();
            }
        }
        id
    }

    /// Drops every entry whose deadline has passed. Returns how many went.
    pub fn prune(&mut self, now_ms: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|n| n.expires_at > now_ms);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
