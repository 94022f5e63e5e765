//! # Freehub marketplace public API
//!
//! The `market_api` module exposes the programmatic API of the engine. Each API is created by supplying a storage
//! backend that implements the backend traits that API needs, plus (for the APIs that emit events) the event
//! producers to publish to.
//!
//! * [`order_flow_api`] places orders and drives them through their lifecycle.
//! * [`notification_api`] lets users read and acknowledge their notifications.
//! * [`gig_api`] manages gig listings.
//! * [`review_api`] posts and lists gig reviews.
//!
//! ```rust,ignore
//! use freehub_engine::{events::EventProducers, OrderFlowApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/freehub.db", 5).await?;
//! let api = OrderFlowApi::new(db, EventProducers::default());
//! let order = api.place_order(&client, gig_id).await?;
//! ```
pub mod errors;
pub mod gig_api;
pub mod notification_api;
pub mod order_flow_api;
pub mod review_api;
