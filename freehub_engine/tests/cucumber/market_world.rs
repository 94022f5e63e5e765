use std::collections::HashMap;

use cucumber::World;
use freehub_engine::{
    db_types::{GigId, OrderId, UserProfile},
    events::EventProducers,
    MarketError,
    MarketplaceDatabase,
    NotificationApi,
    OrderFlowApi,
    SqliteDatabase,
};

use crate::support::prepare_env::{prepare_test_env, user};

#[derive(Default, Debug, World)]
pub struct MarketWorld {
    pub system: Option<MarketSystem>,
    /// The order the scenario is currently talking about
    pub current_order: Option<OrderId>,
    pub last_error: Option<MarketError>,
}

#[derive(Debug)]
pub struct MarketSystem {
    pub db_url: String,
    pub db: SqliteDatabase,
    pub orders: OrderFlowApi<SqliteDatabase>,
    pub notifications: NotificationApi<SqliteDatabase>,
    pub users: HashMap<String, UserProfile>,
    pub gigs: HashMap<String, GigId>,
}

impl MarketSystem {
    pub async fn new() -> Self {
        let db = prepare_test_env().await;
        let orders = OrderFlowApi::new(db.clone(), EventProducers::default());
        let notifications = NotificationApi::new(db.clone());
        Self { db_url: db.url().to_string(), db, orders, notifications, users: HashMap::new(), gigs: HashMap::new() }
    }

    /// Returns the profile for `name`, registering a new user the first time the name is seen.
    pub fn user(&mut self, name: &str) -> UserProfile {
        let next_id = self.users.len() as i64 + 1;
        self.users.entry(name.to_string()).or_insert_with(|| user(next_id, name)).clone()
    }

    /// Unknown titles resolve to a gig id that does not exist.
    pub fn gig(&self, title: &str) -> GigId {
        self.gigs.get(title).copied().unwrap_or(GigId(9999))
    }
}

impl MarketWorld {
    pub fn system(&mut self) -> &mut MarketSystem {
        self.system.as_mut().expect("The marketplace has not been initialised")
    }

    pub fn order_id(&self) -> OrderId {
        self.current_order.expect("No order has been placed in this scenario")
    }

    pub fn record<T>(&mut self, result: Result<T, MarketError>) -> Option<T> {
        match result {
            Ok(v) => {
                self.last_error = None;
                Some(v)
            },
            Err(e) => {
                self.last_error = Some(e);
                None
            },
        }
    }
}
