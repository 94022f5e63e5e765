//! # Storage backend contracts
//!
//! The traits in this module define what a database backend must provide for the Freehub engine.
//!
//! * [`OrderManagement`] stores orders and performs their status transitions, writing the resulting notifications in
//!   the same transaction.
//! * [`GigManagement`] stores gig listings and maintains their counters.
//! * [`NotificationManagement`] gives recipients access to their notifications.
//! * [`ReviewManagement`] stores reviews and the gig rating aggregate.
//! * [`UserManagement`] keeps the display profiles of the users taking part in the marketplace.
//! * [`MarketplaceDatabase`] ties all of the above together.
mod data_objects;
mod errors;
mod gig_management;
mod marketplace_database;
mod notification_management;
mod order_management;
mod review_management;
mod user_management;

pub use data_objects::{GigDeletion, OrderQueryFilter, StatusUpdateResult};
pub use errors::StorageError;
pub use gig_management::GigManagement;
pub use marketplace_database::MarketplaceDatabase;
pub use notification_management::NotificationManagement;
pub use order_management::OrderManagement;
pub use review_management::ReviewManagement;
pub use user_management::UserManagement;
