use cucumber::{then, when};
use freehub_engine::{
    db_types::{OrderStatusType, Price},
    MarketError,
    OrderManagement,
};

use crate::cucumber::MarketWorld;

#[when(expr = "{word} orders {string}")]
async fn place_order(world: &mut MarketWorld, client: String, title: String) {
    let system = world.system();
    let client = system.user(&client);
    let gig = system.gig(&title);
    let result = system.orders.place_order(&client, gig).await;
    if let Some(order) = world.record(result) {
        world.current_order = Some(order.id);
    }
}

#[when(expr = "{word} checks out {string}")]
async fn place_orders(world: &mut MarketWorld, client: String, titles: String) {
    let system = world.system();
    let client = system.user(&client);
    let gigs = titles.split(',').map(|t| system.gig(t.trim())).collect::<Vec<_>>();
    let result = system.orders.place_orders(&client, &gigs).await;
    if let Some(orders) = world.record(result) {
        world.current_order = orders.last().map(|o| o.id);
    }
}

#[when(expr = "{word} accepts the order")]
async fn accept_order(world: &mut MarketWorld, actor: String) {
    let id = world.order_id();
    let system = world.system();
    let actor = system.user(&actor);
    let result = system.orders.accept_order(&actor, id).await;
    world.record(result);
}

#[when(expr = "{word} rejects the order")]
async fn reject_order(world: &mut MarketWorld, actor: String) {
    let id = world.order_id();
    let system = world.system();
    let actor = system.user(&actor);
    let result = system.orders.reject_order(&actor, id, None).await;
    world.record(result);
}

#[when(expr = "{word} rejects the order because {string}")]
async fn reject_order_with_reason(world: &mut MarketWorld, actor: String, reason: String) {
    let id = world.order_id();
    let system = world.system();
    let actor = system.user(&actor);
    let result = system.orders.reject_order(&actor, id, Some(&reason)).await;
    world.record(result);
}

#[when(expr = "{word} marks the order as {word}")]
async fn set_status(world: &mut MarketWorld, actor: String, status: String) {
    let id = world.order_id();
    let status: OrderStatusType =
        serde_json::from_value(serde_json::Value::String(status)).expect("Not a valid order status");
    let system = world.system();
    let actor = system.user(&actor);
    let result = system.orders.update_order_status(&actor, id, status).await;
    world.record(result);
}

#[when(expr = "{word} reads their latest notification")]
async fn read_latest(world: &mut MarketWorld, name: String) {
    let system = world.system();
    let user = system.user(&name).id;
    let list = system.notifications.notifications_for_user(user).await.expect("Error fetching notifications");
    let latest = list.first().expect("There are no notifications").id;
    let result = system.notifications.mark_as_read(user, latest).await;
    world.record(result);
}

#[then(expr = "the order is {word}")]
async fn check_status(world: &mut MarketWorld, status: String) {
    let id = world.order_id();
    let order = world.system().db.fetch_order(id).await.expect("Error fetching order").expect("Order not found");
    assert_eq!(order.status.to_string(), status);
}

#[then(expr = "the order amount is {int} cents")]
async fn check_amount(world: &mut MarketWorld, amount: i64) {
    let id = world.order_id();
    let order = world.system().db.fetch_order(id).await.expect("Error fetching order").expect("Order not found");
    assert_eq!(order.amount, Price::from(amount));
}

#[then(expr = "the request is refused as {word}")]
async fn check_error(world: &mut MarketWorld, kind: String) {
    let err = world.last_error.as_ref().expect("The last request succeeded");
    let actual = match err {
        MarketError::InvalidInput(_) => "invalid",
        MarketError::Forbidden(_) => "forbidden",
        MarketError::NotFound(_) => "missing",
        MarketError::InvalidState(_) => "conflicting",
        MarketError::StorageError(_) => "broken",
    };
    assert_eq!(actual, kind, "Unexpected error: {err}");
}

#[then(expr = "the request succeeds")]
async fn check_success(world: &mut MarketWorld) {
    if let Some(err) = &world.last_error {
        panic!("The last request failed: {err}");
    }
}

#[then(expr = "{word} has {int} order(s)")]
async fn check_order_count(world: &mut MarketWorld, name: String, count: usize) {
    let system = world.system();
    let user = system.user(&name).id;
    let orders = system.orders.orders_for_user(user).await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}

#[then(expr = "{word} has {int} notification(s)")]
async fn check_notification_count(world: &mut MarketWorld, name: String, count: usize) {
    let system = world.system();
    let user = system.user(&name).id;
    let list = system.notifications.notifications_for_user(user).await.expect("Error fetching notifications");
    assert_eq!(list.len(), count);
}

#[then(expr = "{word} has {int} unread notification(s)")]
async fn check_unread_count(world: &mut MarketWorld, name: String, count: i64) {
    let system = world.system();
    let user = system.user(&name).id;
    let unread = system.notifications.unread_count(user).await.expect("Error counting notifications");
    assert_eq!(unread, count);
}

#[then(expr = "{word}'s latest notification is {word} with message {string}")]
async fn check_latest_notification(world: &mut MarketWorld, name: String, kind: String, message: String) {
    let system = world.system();
    let user = system.user(&name).id;
    let list = system.notifications.notifications_for_user(user).await.expect("Error fetching notifications");
    let latest = list.first().expect("There are no notifications");
    assert_eq!(latest.notification_type.to_string(), kind);
    assert_eq!(latest.message, message);
}
