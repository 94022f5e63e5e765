use freehub_engine::{
    db_types::{Gig, GigCategory, NewGig, Price, UserId, UserProfile},
    GigApi,
    MarketplaceDatabase,
    SqliteDatabase,
};
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/freehub_test_{}.db", dir.display(), rand::random::<u64>())
}

/// Creates a fresh, migrated database in a temporary file.
pub async fn prepare_test_env() -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let url = random_db_path();
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    debug!("🚀️ Test database ready at {url}");
    db
}

pub async fn tear_down(mut db: SqliteDatabase) {
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    if let Err(e) = Sqlite::drop_database(db.url()).await {
        warn!("🚀️ Failed to remove test database {}: {e}", db.url());
    }
}

pub fn user(id: i64, name: &str) -> UserProfile {
    UserProfile::new(UserId(id), name, format!("{}@example.com", name.to_lowercase()))
}

pub fn new_gig(title: &str, price: i64) -> NewGig {
    NewGig {
        title: title.to_string(),
        description: format!("{title}, delivered with care"),
        price: Price::from(price),
        delivery_time: 3,
        category: GigCategory::GraphicDesign,
        images: vec!["uploads/gig.png".to_string()],
        created_by: UserId(0),
    }
}

/// Lists a gig owned by `owner` and returns it.
pub async fn seed_gig(db: &SqliteDatabase, owner: &UserProfile, title: &str, price: i64) -> Gig {
    GigApi::new(db.clone()).create_gig(owner, new_gig(title, price)).await.expect("Error creating gig")
}
