#[cfg(test)]
#[path = "notifications_test.rs"]
mod tests;

use std::time::Duration;
use std::time::Instant;

use crate::domain::models::Notification;

const EXPIRES_AFTER: Duration = Duration::from_secs(4);
const MAX_VISIBLE: usize = 3;

/// Short lived toasts shown above the chat.
#[derive(Default)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification) {
        tracing::debug!(level = ?notification.level, text = notification.text.as_str(), "Notification");
        self.items.push(notification);
        if self.items.len() > MAX_VISIBLE {
            self.items.remove(0);
        }
    }

    pub fn visible(&self) -> &[Notification] {
        return &self.items;
    }

    pub fn tick(&mut self, now: Instant) {
        self.items.retain(|item| {
            return now.saturating_duration_since(item.created_at) < EXPIRES_AFTER;
        });
    }
}
