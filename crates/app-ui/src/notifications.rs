//! Transient notifications
//!
//! The toast model: every user-visible success or failure becomes a
//! notification in this queue, and nothing else happens to it. Failures are
//! never fatal; the queue is where they end up.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationColor {
    /// Success (green)
    Green,
    /// Error (red)
    Red,
}

/// A single transient notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier, used for dismissal
    pub id: String,
    /// Notification title
    pub title: String,
    /// Notification body
    pub message: String,
    /// Notification color
    pub color: NotificationColor,
}

/// Queue of active notifications, newest last
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    active: Vec<Notification>,
}

impl NotificationQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a success notification
    pub fn notify_success(&mut self, title: impl Into<String>, message: impl Into<String>) -> String {
        self.push(title.into(), message.into(), NotificationColor::Green)
    }

    /// Push an error notification
    pub fn notify_error(&mut self, title: impl Into<String>, message: impl Into<String>) -> String {
        self.push(title.into(), message.into(), NotificationColor::Red)
    }

    fn push(&mut self, title: String, message: String, color: NotificationColor) -> String {
        let id = Uuid::new_v4().to_string();
        tracing::debug!(%id, title, "notification queued");
        self.active.push(Notification {
            id: id.clone(),
            title,
            message,
            color,
        });
        id
    }

    /// Dismiss a notification by id
    pub fn dismiss(&mut self, id: &str) {
        self.active.retain(|n| n.id != id);
    }

    /// Currently active notifications
    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_and_dismiss() {
        let mut queue = NotificationQueue::new();

        let id = queue.notify_success("Todo created", "Buy milk");
        queue.notify_error("Failed to create todo", "title required");
        assert_eq!(queue.active().len(), 2);

        queue.dismiss(&id);
        assert_eq!(queue.active().len(), 1);
        assert_eq!(queue.active()[0].color, NotificationColor::Red);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut queue = NotificationQueue::new();
        let a = queue.notify_success("a", "");
        let b = queue.notify_success("b", "");

        assert_ne!(a, b);
    }
}
