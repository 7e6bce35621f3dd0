//! Broadcast channel for mutation notifications.

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use eventdesk_core::query::Notification;

/// Default number of notifications buffered per subscriber.
pub const DEFAULT_CAPACITY: usize = 100;

/// Fan-out of settled-mutation notifications to any number of subscribers.
///
/// Publishing with no subscribers is not an error; the notification is
/// simply dropped. Slow subscribers lose the oldest messages first.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<Notification>,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, notification: Notification) {
        tracing::trace!(
            level = ?notification.level,
            message = %notification.message,
            "publishing notification"
        );
        let _ = self.sender.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Subscribes as a `Stream`. Lagged messages surface as stream errors.
    pub fn stream(&self) -> BroadcastStream<Notification> {
        BroadcastStream::new(self.subscribe())
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
