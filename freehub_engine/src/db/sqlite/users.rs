use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db::traits::StorageError,
    db_types::UserProfile,
};

pub async fn upsert_user(user: &UserProfile, conn: &mut SqliteConnection) -> Result<(), StorageError> {
    sqlx::query(
        r#"
            INSERT INTO users (id, name, email) VALUES (?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                updated_at = CURRENT_TIMESTAMP
            WHERE name <> excluded.name OR email <> excluded.email
        "#,
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .execute(conn)
    .await?;
    trace!("🗃️ User profile {} recorded", user.id);
    Ok(())
}
