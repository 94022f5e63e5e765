use actix_web::{
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use freehub_engine::db_types::{
    Gig,
    GigCategory,
    GigId,
    GigStatus,
    GigSummary,
    Notification,
    NotificationId,
    NotificationType,
    Order,
    OrderDetails,
    OrderId,
    OrderStatusType,
    Price,
    UserId,
    UserProfile,
};
use log::debug;
use serde_json::Value;

use crate::{
    auth::TokenIssuer,
    config::{AuthConfig, Environment},
    server::{internal_error_filter, path_error_handlers, request_error_handlers},
};

// The signing secret for test tokens. DO NOT re-use it anywhere.
const TEST_JWT_SECRET: &str = "freehub-endpoint-tests-only-secret-value";

pub fn token_issuer() -> TokenIssuer {
    TokenIssuer::new(&AuthConfig::new(TEST_JWT_SECRET, Duration::hours(1)))
}

pub fn issue_token(user: &UserProfile) -> String {
    token_issuer().issue_token(user, None).expect("Failed to sign token")
}

pub fn alice() -> UserProfile {
    UserProfile::new(UserId(1), "Alice", "alice@example.com")
}

pub fn bob() -> UserProfile {
    UserProfile::new(UserId(2), "Bob", "bob@example.com")
}

pub fn mallory() -> UserProfile {
    UserProfile::new(UserId(3), "Mallory", "mallory@example.com")
}

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// A logo design gig for $25.00, owned by Bob.
pub fn logo_gig() -> Gig {
    Gig {
        id: GigId(10),
        title: "Logo design".into(),
        description: "A logo for your brand".into(),
        price: Price::from(2500),
        delivery_time: 3,
        category: GigCategory::GraphicDesign,
        images: vec!["uploads/logo.png".into()],
        created_by: Some(bob().id),
        status: GigStatus::Active,
        views: 0,
        orders: 0,
        rating: 0.0,
        review_count: 0,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

/// Alice's order for the logo gig.
pub fn order(status: OrderStatusType) -> Order {
    Order {
        id: OrderId(100),
        gig_id: GigId(10),
        client_id: alice().id,
        freelancer_id: bob().id,
        amount: Price::from(2500),
        status,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn order_details(status: OrderStatusType) -> OrderDetails {
    let gig = logo_gig();
    OrderDetails {
        id: OrderId(100),
        gig: GigSummary {
            id: gig.id,
            title: gig.title,
            price: gig.price,
            category: gig.category,
            status: gig.status,
            images: gig.images,
        },
        client: alice(),
        freelancer: bob(),
        amount: Price::from(2500),
        status,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn notification(id: i64, recipient: UserId, kind: NotificationType, is_read: bool) -> Notification {
    Notification {
        id: NotificationId(id),
        user_id: recipient,
        notification_type: kind,
        title: kind.title().into(),
        message: "Your order for \"Logo design\" has been accepted by Bob".into(),
        order_id: Some(OrderId(100)),
        gig_id: Some(GigId(10)),
        sender_id: Some(bob().id),
        is_read,
        created_at: timestamp(),
    }
}

/// Sends the request to a production app configured with `configure`, and returns the status code and the parsed
/// JSON body. Non-JSON bodies are returned as a JSON string.
pub async fn send_request<F>(req: TestRequest, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    send_request_in(Environment::Production, req, configure).await
}

pub async fn send_request_in<F>(environment: Environment, req: TestRequest, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new()
        .wrap(internal_error_filter(environment))
        .app_data(web::Data::new(token_issuer()))
        .app_data(request_error_handlers())
        .app_data(path_error_handlers())
        .configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let body = serde_json::from_slice(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
    (status, body)
}

pub fn authed(req: TestRequest, user: &UserProfile) -> TestRequest {
    req.insert_header(("Authorization", format!("Bearer {}", issue_token(user))))
}
