use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{gigs, new_pool, notifications, orders, reviews, users};
use crate::{
    db::traits::{
        GigDeletion,
        GigManagement,
        MarketplaceDatabase,
        NotificationManagement,
        OrderManagement,
        OrderQueryFilter,
        ReviewManagement,
        StatusUpdateResult,
        StorageError,
        UserManagement,
    },
    db_types::{
        Gig,
        GigId,
        GigStatus,
        GigUpdate,
        NewGig,
        NewNotification,
        NewOrder,
        NewReview,
        Notification,
        NotificationDetails,
        NotificationId,
        Order,
        OrderDetails,
        OrderId,
        OrderStatusType,
        Review,
        ReviewDetails,
        UserId,
        UserProfile,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = new_pool(url, max_connections).await?;
        trace!("🗃️ Created new SQLite connection pool for {url}");
        Ok(Self { url: url.to_string(), pool })
    }

    /// Brings the schema up to date. It is safe to call this on every startup.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl MarketplaceDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        self.pool.close().await;
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order(id, &mut conn).await
    }

    async fn fetch_order_details(&self, id: OrderId) -> Result<Option<OrderDetails>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_details(id, &mut conn).await
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<OrderDetails>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        orders::search_orders(query, &mut conn).await
    }

    /// In a single atomic transaction,
    /// * stores the order,
    /// * bumps the gig's `orders` counter,
    /// * stores the `new_order` notification, linked to the new order.
    async fn insert_order(
        &self,
        order: NewOrder,
        notification: NewNotification,
    ) -> Result<(Order, Notification), StorageError> {
        let mut tx = self.pool.begin().await?;
        let gig_id = order.gig_id;
        let order = orders::insert_order(order, &mut tx).await?;
        if !gigs::increment_orders(gig_id, &mut tx).await? {
            warn!("🗃️ Gig {gig_id} was not found when updating its order count");
        }
        let notification = notifications::insert_notification(notification, order.id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order {} and notification {} committed", order.id, notification.id);
        Ok((order, notification))
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        expected: OrderStatusType,
        status: OrderStatusType,
        notification: Option<NewNotification>,
    ) -> Result<StatusUpdateResult, StorageError> {
        let mut tx = self.pool.begin().await?;
        if !orders::compare_and_set_status(id, expected, status, &mut tx).await? {
            tx.rollback().await?;
            return Ok(StatusUpdateResult::StatusMismatch);
        }
        let notification = match notification {
            Some(n) => Some(notifications::insert_notification(n, id, &mut tx).await?),
            None => None,
        };
        let order = orders::fetch_order(id, &mut tx)
            .await?
            .ok_or_else(|| StorageError::QueryError(format!("Order {id} vanished during a status update")))?;
        tx.commit().await?;
        Ok(StatusUpdateResult::Updated { order, notification })
    }
}

impl GigManagement for SqliteDatabase {
    async fn fetch_gig(&self, id: GigId) -> Result<Option<Gig>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        gigs::fetch_gig(id, &mut conn).await
    }

    async fn insert_gig(&self, gig: NewGig) -> Result<Gig, StorageError> {
        let mut conn = self.pool.acquire().await?;
        gigs::insert_gig(gig, &mut conn).await
    }

    async fn fetch_gigs_for_owner(&self, owner: UserId) -> Result<Vec<Gig>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        gigs::fetch_gigs_for_owner(owner, &mut conn).await
    }

    async fn fetch_gigs_with_status(&self, status: GigStatus) -> Result<Vec<Gig>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        gigs::fetch_gigs_with_status(status, &mut conn).await
    }

    async fn update_gig(&self, id: GigId, update: GigUpdate) -> Result<Option<Gig>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        if !gigs::update_gig(id, update, &mut conn).await? {
            return Ok(None);
        }
        gigs::fetch_gig(id, &mut conn).await
    }

    async fn update_gig_status(&self, id: GigId, status: GigStatus) -> Result<Option<Gig>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        if !gigs::update_status(id, status, &mut conn).await? {
            return Ok(None);
        }
        gigs::fetch_gig(id, &mut conn).await
    }

    async fn increment_gig_views(&self, id: GigId) -> Result<Option<Gig>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        if !gigs::increment_views(id, &mut conn).await? {
            return Ok(None);
        }
        gigs::fetch_gig(id, &mut conn).await
    }

    /// Both deletes are guarded by the same "no orders" condition.
    async fn delete_gig(&self, id: GigId) -> Result<GigDeletion, StorageError> {
        let mut tx = self.pool.begin().await?;
        let removed_reviews = reviews::delete_reviews_for_unordered_gig(id, &mut tx).await?;
        if gigs::delete_unordered_gig(id, &mut tx).await? {
            tx.commit().await?;
            debug!("🗃️ Gig {id} deleted along with {removed_reviews} reviews");
            return Ok(GigDeletion::Deleted);
        }
        let result = match gigs::fetch_gig(id, &mut tx).await? {
            Some(_) => GigDeletion::HasOrders,
            None => GigDeletion::NotFound,
        };
        tx.rollback().await?;
        Ok(result)
    }
}

impl NotificationManagement for SqliteDatabase {
    async fn fetch_notification(&self, id: NotificationId) -> Result<Option<Notification>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        notifications::fetch_notification(id, &mut conn).await
    }

    async fn fetch_notifications_for_user(
        &self,
        user: UserId,
        limit: u32,
    ) -> Result<Vec<NotificationDetails>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        notifications::fetch_notifications_for_user(user, limit, &mut conn).await
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<Option<Notification>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        if !notifications::mark_read(id, &mut conn).await? {
            return Ok(None);
        }
        notifications::fetch_notification(id, &mut conn).await
    }

    async fn count_unread_notifications(&self, user: UserId) -> Result<i64, StorageError> {
        let mut conn = self.pool.acquire().await?;
        notifications::count_unread(user, &mut conn).await
    }
}

impl ReviewManagement for SqliteDatabase {
    async fn insert_review(&self, review: NewReview) -> Result<Review, StorageError> {
        let mut tx = self.pool.begin().await?;
        let gig_id = review.gig_id;
        let rating = review.rating;
        let review = reviews::insert_review(review, &mut tx).await?;
        if !gigs::add_rating(gig_id, rating, &mut tx).await? {
            warn!("🗃️ Gig {gig_id} was not found when updating its rating");
        }
        tx.commit().await?;
        Ok(review)
    }

    async fn fetch_reviews_for_gig(&self, gig_id: GigId) -> Result<Vec<ReviewDetails>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        reviews::fetch_reviews_for_gig(gig_id, &mut conn).await
    }
}

impl UserManagement for SqliteDatabase {
    async fn upsert_user(&self, user: &UserProfile) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await?;
        users::upsert_user(user, &mut conn).await
    }
}
