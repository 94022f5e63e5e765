use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db::traits::StorageError,
    db_types::{GigId, NewReview, Review, ReviewDetails, ReviewDetailsRow, ReviewId},
};

pub async fn insert_review(review: NewReview, conn: &mut SqliteConnection) -> Result<Review, StorageError> {
    let id = sqlx::query("INSERT INTO reviews (gig_id, user_id, rating, comment) VALUES (?, ?, ?, ?)")
        .bind(review.gig_id)
        .bind(review.user_id)
        .bind(review.rating)
        .bind(&review.comment)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    debug!("🗃️ Review #{id} ({} stars) saved for gig {}", review.rating, review.gig_id);
    fetch_review(ReviewId(id), conn)
        .await?
        .ok_or_else(|| StorageError::QueryError(format!("Review #{id} vanished straight after it was inserted")))
}

pub async fn fetch_review(id: ReviewId, conn: &mut SqliteConnection) -> Result<Option<Review>, StorageError> {
    let review = sqlx::query_as("SELECT id, gig_id, user_id, rating, comment, created_at FROM reviews WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(review)
}

pub async fn fetch_reviews_for_gig(gig_id: GigId, conn: &mut SqliteConnection) -> Result<Vec<ReviewDetails>, StorageError> {
    let rows: Vec<ReviewDetailsRow> = sqlx::query_as(
        r#"
            SELECT
                r.id, r.gig_id, r.rating, r.comment, r.created_at,
                u.id AS user_id, u.name AS user_name, u.email AS user_email
            FROM reviews r JOIN users u ON u.id = r.user_id
            WHERE r.gig_id = ?
            ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(gig_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(ReviewDetails::from).collect())
}

/// Deletes the reviews of a gig, but only if no order refers to that gig. Returns the number of reviews removed.
pub async fn delete_reviews_for_unordered_gig(gig_id: GigId, conn: &mut SqliteConnection) -> Result<u64, StorageError> {
    let result = sqlx::query(
        "DELETE FROM reviews WHERE gig_id = ? AND NOT EXISTS (SELECT 1 FROM orders WHERE orders.gig_id = ?)",
    )
    .bind(gig_id)
    .bind(gig_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
