use super::StorageError;
use crate::db_types::{GigId, NewReview, Review, ReviewDetails};

#[allow(async_fn_in_trait)]
pub trait ReviewManagement {
    /// Stores the review and folds its rating into the gig's running average, in a single transaction.
    async fn insert_review(&self, review: NewReview) -> Result<Review, StorageError>;

    async fn fetch_reviews_for_gig(&self, gig_id: GigId) -> Result<Vec<ReviewDetails>, StorageError>;
}
