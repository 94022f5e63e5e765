use log::{debug, trace};
use sqlx::{types::Json, SqliteConnection};

use crate::{
    db::traits::StorageError,
    db_types::{Gig, GigId, GigRow, GigStatus, GigUpdate, NewGig, UserId},
};

const GIG_COLUMNS: &str = "id, title, description, price, delivery_time, category, images, created_by, status, views, \
                           orders, rating, review_count, created_at, updated_at";

pub async fn insert_gig(gig: NewGig, conn: &mut SqliteConnection) -> Result<Gig, StorageError> {
    let id = sqlx::query(
        r#"
            INSERT INTO gigs (title, description, price, delivery_time, category, images, created_by, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&gig.title)
    .bind(&gig.description)
    .bind(gig.price)
    .bind(gig.delivery_time)
    .bind(gig.category)
    .bind(Json(&gig.images))
    .bind(gig.created_by)
    .bind(GigStatus::Active)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();
    debug!("🗃️ Gig #{id} created for user {}", gig.created_by);
    fetch_gig(GigId(id), conn)
        .await?
        .ok_or_else(|| StorageError::QueryError(format!("Gig #{id} vanished straight after it was inserted")))
}

pub async fn fetch_gig(id: GigId, conn: &mut SqliteConnection) -> Result<Option<Gig>, StorageError> {
    let row: Option<GigRow> = sqlx::query_as(&format!("SELECT {GIG_COLUMNS} FROM gigs WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(Gig::from))
}

pub async fn fetch_gigs_for_owner(owner: UserId, conn: &mut SqliteConnection) -> Result<Vec<Gig>, StorageError> {
    let rows: Vec<GigRow> =
        sqlx::query_as(&format!("SELECT {GIG_COLUMNS} FROM gigs WHERE created_by = ? ORDER BY created_at DESC, id DESC"))
            .bind(owner)
            .fetch_all(conn)
            .await?;
    trace!("🗃️ {} gigs found for user {owner}", rows.len());
    Ok(rows.into_iter().map(Gig::from).collect())
}

pub async fn fetch_gigs_with_status(status: GigStatus, conn: &mut SqliteConnection) -> Result<Vec<Gig>, StorageError> {
    let rows: Vec<GigRow> =
        sqlx::query_as(&format!("SELECT {GIG_COLUMNS} FROM gigs WHERE status = ? ORDER BY created_at DESC, id DESC"))
            .bind(status)
            .fetch_all(conn)
            .await?;
    trace!("🗃️ {} gigs found with status {status}", rows.len());
    Ok(rows.into_iter().map(Gig::from).collect())
}

/// Returns `false` if the gig does not exist.
pub async fn update_gig(id: GigId, update: GigUpdate, conn: &mut SqliteConnection) -> Result<bool, StorageError> {
    let result = sqlx::query(
        r#"
            UPDATE gigs SET
                title = ?,
                description = ?,
                price = ?,
                delivery_time = ?,
                category = ?,
                images = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
        "#,
    )
    .bind(&update.title)
    .bind(&update.description)
    .bind(update.price)
    .bind(update.delivery_time)
    .bind(update.category)
    .bind(Json(&update.images))
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Deletes the gig, unless an order refers to it. Its reviews must already be gone. Returns `false` if nothing was
/// deleted.
pub async fn delete_unordered_gig(id: GigId, conn: &mut SqliteConnection) -> Result<bool, StorageError> {
    let result =
        sqlx::query("DELETE FROM gigs WHERE id = ? AND NOT EXISTS (SELECT 1 FROM orders WHERE orders.gig_id = ?)")
            .bind(id)
            .bind(id)
            .execute(conn)
            .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns `false` if the gig does not exist.
pub async fn update_status(id: GigId, status: GigStatus, conn: &mut SqliteConnection) -> Result<bool, StorageError> {
    let result = sqlx::query("UPDATE gigs SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns `false` if the gig does not exist.
pub async fn increment_views(id: GigId, conn: &mut SqliteConnection) -> Result<bool, StorageError> {
    let result = sqlx::query("UPDATE gigs SET views = views + 1 WHERE id = ?").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn increment_orders(id: GigId, conn: &mut SqliteConnection) -> Result<bool, StorageError> {
    let result = sqlx::query("UPDATE gigs SET orders = orders + 1 WHERE id = ?").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

/// Folds a new review rating into the gig's running average.
pub async fn add_rating(id: GigId, rating: i64, conn: &mut SqliteConnection) -> Result<bool, StorageError> {
    let result = sqlx::query(
        r#"
            UPDATE gigs SET
                rating = (rating * review_count + ?) / (review_count + 1),
                review_count = review_count + 1,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
        "#,
    )
    .bind(rating as f64)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}
