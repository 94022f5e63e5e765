use crate::db_types::{Notification, Order, UserId};

/// The outcome of a compare-and-swap status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdateResult {
    /// The order was still in the expected status and has been moved on. The notification is present if one was
    /// requested, and was written in the same transaction.
    Updated { order: Order, notification: Option<Notification> },
    /// The order no longer had the expected status (or no longer exists). Nothing was written.
    StatusMismatch,
}

/// The outcome of deleting a gig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GigDeletion {
    /// The gig and its reviews are gone.
    Deleted,
    NotFound,
    /// Orders refer to the gig, so it was left in place.
    HasOrders,
}

/// Criteria for [`crate::OrderManagement::search_orders`]. All criteria are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQueryFilter {
    pub participant: Option<UserId>,
    pub freelancer_id: Option<UserId>,
}

impl OrderQueryFilter {
    /// Orders where the user is either the client or the freelancer.
    pub fn with_participant(mut self, user: UserId) -> Self {
        self.participant = Some(user);
        self
    }

    pub fn with_freelancer_id(mut self, user: UserId) -> Self {
        self.freelancer_id = Some(user);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.participant.is_none() && self.freelancer_id.is_none()
    }
}
