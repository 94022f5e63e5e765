use super::{OrderQueryFilter, StatusUpdateResult, StorageError};
use crate::db_types::{NewNotification, NewOrder, Notification, Order, OrderDetails, OrderId, OrderStatusType};

/// The `OrderManagement` trait defines the behaviour for storing orders and moving them through their lifecycle.
///
/// Every write that changes an order also writes the notification that the change produces, atomically.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, StorageError>;

    /// Fetches the order with its gig summary and both participants resolved.
    async fn fetch_order_details(&self, id: OrderId) -> Result<Option<OrderDetails>, StorageError>;

    /// Returns the orders matching the filter, newest first.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<OrderDetails>, StorageError>;

    /// Inserts the order, increments the gig's order counter and stores the notification for the freelancer, in a
    /// single transaction.
    async fn insert_order(
        &self,
        order: NewOrder,
        notification: NewNotification,
    ) -> Result<(Order, Notification), StorageError>;

    /// Moves the order from `expected` to `status`, and stores the notification if one is given, in a single
    /// transaction. If the order is not in the `expected` status when the update runs, nothing is written and
    /// [`StatusUpdateResult::StatusMismatch`] is returned.
    async fn update_order_status(
        &self,
        id: OrderId,
        expected: OrderStatusType,
        status: OrderStatusType,
        notification: Option<NewNotification>,
    ) -> Result<StatusUpdateResult, StorageError>;
}
