use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::NotificationManagement,
    db_types::{Notification, NotificationDetails, NotificationId, UserId},
    market_api::errors::MarketError,
};

/// The maximum number of notifications returned by [`NotificationApi::notifications_for_user`].
pub const NOTIFICATION_LIST_LIMIT: u32 = 50;

pub struct NotificationApi<B> {
    db: B,
}

impl<B> Debug for NotificationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationApi")
    }
}

impl<B> NotificationApi<B>
where B: NotificationManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// The most recent notifications for the user, newest first.
    pub async fn notifications_for_user(&self, user: UserId) -> Result<Vec<NotificationDetails>, MarketError> {
        let notifications = self.db.fetch_notifications_for_user(user, NOTIFICATION_LIST_LIMIT).await?;
        Ok(notifications)
    }

    /// Marks the notification as read. Only the recipient may do this. Calling this on a notification that has
    /// already been read succeeds and changes nothing.
    pub async fn mark_as_read(&self, user: UserId, id: NotificationId) -> Result<Notification, MarketError> {
        let notification = self
            .db
            .fetch_notification(id)
            .await?
            .ok_or_else(|| MarketError::NotFound("Notification not found".into()))?;
        if notification.user_id != user {
            debug!("📬️ User {user} tried to mark notification {id} belonging to {} as read", notification.user_id);
            return Err(MarketError::Forbidden("Not authorized to update this notification".into()));
        }
        if notification.is_read {
            return Ok(notification);
        }
        let notification = self
            .db
            .mark_notification_read(id)
            .await?
            .ok_or_else(|| MarketError::NotFound("Notification not found".into()))?;
        trace!("📬️ Notification {id} marked as read");
        Ok(notification)
    }

    pub async fn unread_count(&self, user: UserId) -> Result<i64, MarketError> {
        let count = self.db.count_unread_notifications(user).await?;
        Ok(count)
    }
}
