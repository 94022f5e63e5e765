use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::{GigManagement, OrderManagement, OrderQueryFilter, StatusUpdateResult, UserManagement},
    db_types::{Gig, GigId, NewOrder, Order, OrderDetails, OrderId, OrderStatusType, UserId, UserProfile},
    events::{EventProducers, NotificationEvent, OrderCreatedEvent, OrderStatusChangedEvent},
    market_api::errors::MarketError,
    order_lifecycle::{new_order_notification, status_notification, transition, OrderAction, ParticipantRole},
};

/// `OrderFlowApi` is the primary API for placing orders and moving them through their lifecycle.
///
/// Every successful write stores its notification in the same transaction, and then publishes the order and
/// notification events to the configured hooks.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement + GigManagement + UserManagement
{
    /// Places an order for a single gig.
    ///
    /// The order amount is the gig's price right now. The gig owner receives a `new_order` notification.
    pub async fn place_order(&self, client: &UserProfile, gig_id: GigId) -> Result<Order, MarketError> {
        self.db.upsert_user(client).await?;
        let gig = self.db.fetch_gig(gig_id).await?.ok_or_else(|| MarketError::NotFound("Gig not found".into()))?;
        let freelancer = gig_owner(&gig).ok_or_else(|| {
            warn!("🔄️📦️ Gig {gig_id} has no owner. It cannot be ordered.");
            MarketError::InvalidState("Gig creator information is missing".into())
        })?;
        if freelancer == client.id {
            return Err(MarketError::InvalidInput("You cannot order your own gig".into()));
        }
        self.create_order(client, &gig, freelancer).await
    }

    /// Places one order for every gig in `gig_ids` that can be ordered.
    ///
    /// Gigs that do not exist, have no owner, or belong to the client are skipped. The call fails only if no order
    /// at all could be placed.
    pub async fn place_orders(&self, client: &UserProfile, gig_ids: &[GigId]) -> Result<Vec<Order>, MarketError> {
        if gig_ids.is_empty() {
            return Err(MarketError::InvalidInput("Gig IDs array is required".into()));
        }
        self.db.upsert_user(client).await?;
        let mut orders = Vec::with_capacity(gig_ids.len());
        for &gig_id in gig_ids {
            let Some(gig) = self.db.fetch_gig(gig_id).await? else {
                debug!("🔄️📦️ Gig {gig_id} does not exist. Skipping it.");
                continue;
            };
            let Some(freelancer) = gig_owner(&gig) else {
                debug!("🔄️📦️ Gig {gig_id} has no owner. Skipping it.");
                continue;
            };
            if freelancer == client.id {
                debug!("🔄️📦️ Gig {gig_id} belongs to the client. Skipping it.");
                continue;
            }
            orders.push(self.create_order(client, &gig, freelancer).await?);
        }
        if orders.is_empty() {
            return Err(MarketError::InvalidInput("No valid gigs found to create orders".into()));
        }
        info!("🔄️📦️ {} of {} orders placed for user {}", orders.len(), gig_ids.len(), client.id);
        Ok(orders)
    }

    async fn create_order(&self, client: &UserProfile, gig: &Gig, freelancer: UserId) -> Result<Order, MarketError> {
        let order = NewOrder::new(gig.id, client.id, freelancer, gig.price);
        let notification = new_order_notification(gig.id, &gig.title, freelancer, client);
        let (order, notification) = self.db.insert_order(order, notification).await?;
        info!("🔄️📦️ Order {} placed by {} for gig {} ({})", order.id, client.id, gig.id, order.amount);
        self.producers.publish_order_created(OrderCreatedEvent::new(order.clone())).await;
        self.producers.publish_notification(NotificationEvent::new(notification)).await;
        Ok(order)
    }

    /// The freelancer accepts a pending order. The order moves to `in-progress`.
    pub async fn accept_order(&self, actor: &UserProfile, id: OrderId) -> Result<OrderDetails, MarketError> {
        self.apply(actor, id, OrderAction::Accept, None).await
    }

    /// The freelancer rejects a pending order. The order is cancelled, and `reason`, if given, is passed on to the
    /// client.
    pub async fn reject_order(
        &self,
        actor: &UserProfile,
        id: OrderId,
        reason: Option<&str>,
    ) -> Result<OrderDetails, MarketError> {
        self.apply(actor, id, OrderAction::Reject, reason).await
    }

    /// Sets the order status directly. Either participant may do this, from any status.
    pub async fn update_order_status(
        &self,
        actor: &UserProfile,
        id: OrderId,
        status: OrderStatusType,
    ) -> Result<OrderDetails, MarketError> {
        self.apply(actor, id, OrderAction::SetStatus(status), None).await
    }

    async fn apply(
        &self,
        actor: &UserProfile,
        id: OrderId,
        action: OrderAction,
        reason: Option<&str>,
    ) -> Result<OrderDetails, MarketError> {
        self.db.upsert_user(actor).await?;
        let order = self.db.fetch_order(id).await?.ok_or_else(|| MarketError::NotFound("Order not found".into()))?;
        let role = ParticipantRole::of(&order, actor.id);
        let step = transition(order.status, action, role).map_err(|e| {
            debug!("🔄️📦️ User {} may not {action} order {id}: {e}", actor.id);
            MarketError::from(e)
        })?;
        let notification = match step.notification {
            Some(kind) => {
                let title = self.gig_title(order.gig_id).await?;
                Some(status_notification(kind, &order, &title, actor, reason))
            },
            None => None,
        };
        let result = self.db.update_order_status(id, step.from, step.next, notification).await?;
        let (updated, notification) = match result {
            StatusUpdateResult::Updated { order, notification } => (order, notification),
            StatusUpdateResult::StatusMismatch => {
                info!("🔄️📦️ Order {id} changed status before '{action}' by {} could be applied", actor.id);
                return Err(MarketError::InvalidState(format!(
                    "Order status changed while it was being updated (it was {})",
                    step.from
                )));
            },
        };
        info!("🔄️📦️ Order {id}: {} -> {} by user {}", step.from, step.next, actor.id);
        self.producers.publish_order_status_changed(OrderStatusChangedEvent::new(updated, step.from)).await;
        if let Some(notification) = notification {
            self.producers.publish_notification(NotificationEvent::new(notification)).await;
        }
        self.db.fetch_order_details(id).await?.ok_or_else(|| MarketError::NotFound("Order not found".into()))
    }

    async fn gig_title(&self, gig_id: GigId) -> Result<String, MarketError> {
        let title = match self.db.fetch_gig(gig_id).await? {
            Some(gig) => gig.title,
            None => {
                warn!("🔄️📦️ Gig {gig_id} no longer exists. Using its id in notifications.");
                gig_id.to_string()
            },
        };
        Ok(title)
    }

    /// Fetches an order for one of its participants.
    pub async fn order_for_participant(&self, user: UserId, id: OrderId) -> Result<OrderDetails, MarketError> {
        let order =
            self.db.fetch_order_details(id).await?.ok_or_else(|| MarketError::NotFound("Order not found".into()))?;
        if order.client.id != user && order.freelancer.id != user {
            return Err(MarketError::Forbidden("Not authorized to view this order".into()));
        }
        Ok(order)
    }

    /// All orders the user takes part in, as client or freelancer, newest first.
    pub async fn orders_for_user(&self, user: UserId) -> Result<Vec<OrderDetails>, MarketError> {
        let orders = self.db.search_orders(OrderQueryFilter::default().with_participant(user)).await?;
        trace!("🔄️📦️ {} orders found for user {user}", orders.len());
        Ok(orders)
    }

    /// The orders the user has received as a freelancer, newest first.
    pub async fn orders_for_freelancer(&self, user: UserId) -> Result<Vec<OrderDetails>, MarketError> {
        let orders = self.db.search_orders(OrderQueryFilter::default().with_freelancer_id(user)).await?;
        trace!("🔄️📦️ {} orders found for freelancer {user}", orders.len());
        Ok(orders)
    }
}

fn gig_owner(gig: &Gig) -> Option<UserId> {
    gig.created_by.filter(|id| id.value() > 0)
}
