use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db::traits::StorageError,
    db_types::{NewNotification, Notification, NotificationDetails, NotificationDetailsRow, NotificationId, OrderId, UserId},
};

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, kind, title, message, order_id, gig_id, sender_id, is_read, created_at";

pub async fn insert_notification(
    notification: NewNotification,
    order_id: OrderId,
    conn: &mut SqliteConnection,
) -> Result<Notification, StorageError> {
    let id = sqlx::query(
        r#"
            INSERT INTO notifications (user_id, kind, title, message, order_id, gig_id, sender_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(notification.user_id)
    .bind(notification.notification_type)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(order_id)
    .bind(notification.gig_id)
    .bind(notification.sender_id)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();
    debug!(
        "🗃️ Notification #{id} ({}) for order {order_id} queued for user {}",
        notification.notification_type, notification.user_id
    );
    fetch_notification(NotificationId(id), conn)
        .await?
        .ok_or_else(|| StorageError::QueryError(format!("Notification #{id} vanished straight after it was inserted")))
}

pub async fn fetch_notification(
    id: NotificationId,
    conn: &mut SqliteConnection,
) -> Result<Option<Notification>, StorageError> {
    let notification = sqlx::query_as(&format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(notification)
}

pub async fn fetch_notifications_for_user(
    user: UserId,
    limit: u32,
    conn: &mut SqliteConnection,
) -> Result<Vec<NotificationDetails>, StorageError> {
    let rows: Vec<NotificationDetailsRow> = sqlx::query_as(
        r#"
            SELECT
                n.id, n.user_id, n.kind, n.title, n.message, n.is_read, n.created_at,
                n.order_id, o.status AS order_status, o.amount AS order_amount,
                n.gig_id, g.title AS gig_title,
                n.sender_id, s.name AS sender_name
            FROM notifications n
                LEFT JOIN orders o ON o.id = n.order_id
                LEFT JOIN gigs g ON g.id = n.gig_id
                LEFT JOIN users s ON s.id = n.sender_id
            WHERE n.user_id = ?
            ORDER BY n.created_at DESC, n.id DESC
            LIMIT ?
        "#,
    )
    .bind(user)
    .bind(limit)
    .fetch_all(conn)
    .await?;
    trace!("🗃️ {} notifications fetched for user {user}", rows.len());
    Ok(rows.into_iter().map(NotificationDetails::from).collect())
}

/// Returns `false` if the notification does not exist.
pub async fn mark_read(id: NotificationId, conn: &mut SqliteConnection) -> Result<bool, StorageError> {
    let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = ?").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_unread(user: UserId, conn: &mut SqliteConnection) -> Result<i64, StorageError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = FALSE")
        .bind(user)
        .fetch_one(conn)
        .await?;
    Ok(count)
}
