use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::{GigManagement, ReviewManagement, UserManagement},
    db_types::{GigId, NewReview, Review, ReviewDetails, UserProfile},
    market_api::errors::MarketError,
};

pub struct ReviewApi<B> {
    db: B,
}

impl<B> Debug for ReviewApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReviewApi")
    }
}

impl<B> ReviewApi<B>
where B: ReviewManagement + GigManagement + UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Posts a review and folds its rating into the gig's average rating.
    pub async fn post_review(
        &self,
        author: &UserProfile,
        gig_id: GigId,
        rating: i64,
        comment: &str,
    ) -> Result<Review, MarketError> {
        if !(1..=5).contains(&rating) {
            return Err(MarketError::InvalidInput("Rating must be between 1 and 5".into()));
        }
        if comment.trim().is_empty() {
            return Err(MarketError::InvalidInput("A review comment is required".into()));
        }
        if self.db.fetch_gig(gig_id).await?.is_none() {
            return Err(MarketError::NotFound("Gig not found".into()));
        }
        self.db.upsert_user(author).await?;
        let review =
            NewReview { gig_id, user_id: author.id, rating, comment: comment.to_string() };
        let review = self.db.insert_review(review).await?;
        info!("⭐️ {} reviewed gig {gig_id} with {rating} stars", author.id);
        Ok(review)
    }

    /// Reviews for the gig, newest first.
    pub async fn reviews_for_gig(&self, gig_id: GigId) -> Result<Vec<ReviewDetails>, MarketError> {
        let reviews = self.db.fetch_reviews_for_gig(gig_id).await?;
        Ok(reviews)
    }
}
