use super::{GigDeletion, StorageError};
use crate::db_types::{Gig, GigId, GigStatus, GigUpdate, NewGig, UserId};

#[allow(async_fn_in_trait)]
pub trait GigManagement {
    async fn fetch_gig(&self, id: GigId) -> Result<Option<Gig>, StorageError>;

    async fn insert_gig(&self, gig: NewGig) -> Result<Gig, StorageError>;

    /// All gigs owned by `owner`, newest first.
    async fn fetch_gigs_for_owner(&self, owner: UserId) -> Result<Vec<Gig>, StorageError>;

    /// Every gig in the given status, newest first.
    async fn fetch_gigs_with_status(&self, status: GigStatus) -> Result<Vec<Gig>, StorageError>;

    /// Overwrites the editable fields of the gig. Returns `None` if the gig does not exist.
    async fn update_gig(&self, id: GigId, update: GigUpdate) -> Result<Option<Gig>, StorageError>;

    async fn update_gig_status(&self, id: GigId, status: GigStatus) -> Result<Option<Gig>, StorageError>;

    /// Atomically adds one to the gig's view counter and returns the updated gig.
    async fn increment_gig_views(&self, id: GigId) -> Result<Option<Gig>, StorageError>;

    /// Removes the gig together with its reviews, in a single transaction. Gigs that any order refers to are never
    /// removed.
    async fn delete_gig(&self, id: GigId) -> Result<GigDeletion, StorageError>;
}
