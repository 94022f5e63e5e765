use super::StorageError;
use crate::db_types::{Notification, NotificationDetails, NotificationId, UserId};

#[allow(async_fn_in_trait)]
pub trait NotificationManagement {
    async fn fetch_notification(&self, id: NotificationId) -> Result<Option<Notification>, StorageError>;

    /// The `limit` most recent notifications for the recipient, newest first.
    async fn fetch_notifications_for_user(
        &self,
        user: UserId,
        limit: u32,
    ) -> Result<Vec<NotificationDetails>, StorageError>;

    /// Sets `is_read`. Marking an already-read notification is a no-op that still returns it.
    async fn mark_notification_read(&self, id: NotificationId) -> Result<Option<Notification>, StorageError>;

    async fn count_unread_notifications(&self, user: UserId) -> Result<i64, StorageError>;
}
