use super::{GigManagement, NotificationManagement, OrderManagement, ReviewManagement, StorageError, UserManagement};

/// The highest-level contract for a Freehub storage backend. A backend implementing this trait can drive every
/// API in [`crate::market_api`].
#[allow(async_fn_in_trait)]
pub trait MarketplaceDatabase:
    Clone + OrderManagement + GigManagement + NotificationManagement + ReviewManagement + UserManagement
{
    /// The URL of the database
    fn url(&self) -> &str;

    async fn close(&mut self) -> Result<(), StorageError>;
}
