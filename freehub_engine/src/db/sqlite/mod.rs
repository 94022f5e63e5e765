//! SQLite storage backend.
//!
//! Each table has its own module of free functions that take a `&mut SqliteConnection`, so they can be composed
//! inside a single transaction by [`SqliteDatabase`].
pub mod db;

pub mod gigs;
pub mod notifications;
pub mod orders;
pub mod reviews;
pub mod users;

use std::{str::FromStr, time::Duration};

pub use db::SqliteDatabase;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::db::traits::StorageError;

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(10));
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
