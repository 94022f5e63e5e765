//! Freehub marketplace engine
//!
//! This library holds the core logic of the Freehub marketplace backend: placing orders on gigs, moving orders
//! through their lifecycle, and fanning the resulting notifications out to the users involved. It also manages the
//! gig catalogue and reviews that orders refer to. It knows nothing about HTTP.
//!
//! The library is divided into these sections:
//! 1. Database management ([`mod@db`]). The backend contracts live in `db::traits`; SQLite is the supported backend.
//!    The data types stored in the database are defined in [`db_types`] and are public.
//! 2. The order lifecycle ([`order_lifecycle`]): one pure function that decides every status transition and the
//!    notification it produces.
//! 3. The public API ([`mod@market_api`]). Backends implement the traits in `db::traits` to act as a store for the
//!    APIs.
//!
//! The engine also emits events when orders are created, when their status changes, and when a notification is
//! stored. A simple hook system ([`events`]) lets callers react to these, e.g. to push notifications to a realtime
//! transport.
mod db;

pub mod db_types;
pub mod events;
pub mod market_api;
pub mod order_lifecycle;

#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDatabase;
pub use db::traits::{
    GigDeletion,
    GigManagement,
    MarketplaceDatabase,
    NotificationManagement,
    OrderManagement,
    OrderQueryFilter,
    ReviewManagement,
    StatusUpdateResult,
    StorageError,
    UserManagement,
};
pub use market_api::{
    errors::MarketError,
    gig_api::GigApi,
    notification_api::NotificationApi,
    order_flow_api::OrderFlowApi,
    review_api::ReviewApi,
};
