use std::fmt::Display;

use chrono::{DateTime, Utc};
pub use fh_common::Price;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

id_type!(
    /// The identity of a marketplace user, as asserted by the authentication layer.
    UserId
);
id_type!(GigId);
id_type!(OrderId);
id_type!(NotificationId);
id_type!(ReviewId);

//--------------------------------------     UserProfile       --------------------------------------------------------
/// The minimal user record kept for display purposes. Profiles are recorded from the authenticated identity whenever
/// a user acts on the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl UserProfile {
    pub fn new<S1: Into<String>, S2: Into<String>>(id: UserId, name: S1, email: S2) -> Self {
        Self { id, name: name.into(), email: email.into() }
    }
}

//--------------------------------------      GigStatus        --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    Draft,
    Pending,
    /// Listed and open for orders. New gigs start here.
    Active,
    Paused,
    Rejected,
}

impl Display for GigStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GigStatus::Draft => write!(f, "draft"),
            GigStatus::Pending => write!(f, "pending"),
            GigStatus::Active => write!(f, "active"),
            GigStatus::Paused => write!(f, "paused"),
            GigStatus::Rejected => write!(f, "rejected"),
        }
    }
}

//--------------------------------------     GigCategory       --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum GigCategory {
    WebDevelopment,
    MobileDevelopment,
    GraphicDesign,
    Writing,
    DigitalMarketing,
    VideoAnimation,
    MusicAudio,
    DataScience,
}

impl GigCategory {
    pub const ALL: [GigCategory; 8] = [
        GigCategory::WebDevelopment,
        GigCategory::MobileDevelopment,
        GigCategory::GraphicDesign,
        GigCategory::Writing,
        GigCategory::DigitalMarketing,
        GigCategory::VideoAnimation,
        GigCategory::MusicAudio,
        GigCategory::DataScience,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GigCategory::WebDevelopment => "web-development",
            GigCategory::MobileDevelopment => "mobile-development",
            GigCategory::GraphicDesign => "graphic-design",
            GigCategory::Writing => "writing",
            GigCategory::DigitalMarketing => "digital-marketing",
            GigCategory::VideoAnimation => "video-animation",
            GigCategory::MusicAudio => "music-audio",
            GigCategory::DataScience => "data-science",
        }
    }
}

impl Display for GigCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------          Gig          --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    pub id: GigId,
    pub title: String,
    pub description: String,
    pub price: Price,
    /// Delivery time, in days
    pub delivery_time: i64,
    pub category: GigCategory,
    pub images: Vec<String>,
    /// The owning user. Always set for gigs created through this engine, but legacy records may lack it.
    pub created_by: Option<UserId>,
    pub status: GigStatus,
    pub views: i64,
    pub orders: i64,
    pub rating: f64,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row representation of a [`Gig`]. Images are stored as a JSON array.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct GigRow {
    pub id: GigId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub delivery_time: i64,
    pub category: GigCategory,
    pub images: Json<Vec<String>>,
    pub created_by: Option<UserId>,
    pub status: GigStatus,
    pub views: i64,
    pub orders: i64,
    pub rating: f64,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GigRow> for Gig {
    fn from(row: GigRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            delivery_time: row.delivery_time,
            category: row.category,
            images: row.images.0,
            created_by: row.created_by,
            status: row.status,
            views: row.views,
            orders: row.orders,
            rating: row.rating,
            review_count: row.review_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

//--------------------------------------        NewGig         --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGig {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub delivery_time: i64,
    pub category: GigCategory,
    pub images: Vec<String>,
    pub created_by: UserId,
}

//--------------------------------------      GigChanges       --------------------------------------------------------
/// An owner's edit of a gig listing. Fields left as `None` keep their current value.
#[derive(Debug, Clone, PartialEq)]
pub struct GigChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub delivery_time: Option<i64>,
    pub category: Option<GigCategory>,
    /// Newly uploaded images
    pub images: Vec<String>,
    /// If true, new images are appended to the current ones. Otherwise they replace them.
    pub keep_existing_images: bool,
}

impl GigChanges {
    /// The full set of editable fields that results from applying these changes to `gig`.
    pub fn apply_to(self, gig: &Gig) -> GigUpdate {
        let images = if self.keep_existing_images {
            gig.images.iter().cloned().chain(self.images).collect()
        } else {
            self.images
        };
        GigUpdate {
            title: self.title.unwrap_or_else(|| gig.title.clone()),
            description: self.description.unwrap_or_else(|| gig.description.clone()),
            price: self.price.unwrap_or(gig.price),
            delivery_time: self.delivery_time.unwrap_or(gig.delivery_time),
            category: self.category.unwrap_or(gig.category),
            images,
        }
    }
}

/// The editable fields of a gig, as they are written back to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GigUpdate {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub delivery_time: i64,
    pub category: GigCategory,
    pub images: Vec<String>,
}

//--------------------------------------      GigSummary       --------------------------------------------------------
/// The gig fields that accompany an order when it is displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GigSummary {
    pub id: GigId,
    pub title: String,
    pub price: Price,
    pub category: GigCategory,
    pub status: GigStatus,
    pub images: Vec<String>,
}

//--------------------------------------   OrderStatusType     --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatusType {
    /// The order has been placed and is waiting for the freelancer to respond.
    Pending,
    /// The freelancer accepted the order and is working on it.
    InProgress,
    Completed,
    /// The order was rejected by the freelancer, or cancelled by a participant.
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::InProgress => write!(f, "in-progress"),
            OrderStatusType::Completed => write!(f, "completed"),
            OrderStatusType::Cancelled => write!(f, "cancelled"),
        }
    }
}

//--------------------------------------        Order          --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub gig_id: GigId,
    /// The buyer
    pub client_id: UserId,
    /// The owner of the gig at the time the order was placed
    pub freelancer_id: UserId,
    /// The gig price at the moment the order was placed. Never re-derived afterwards.
    pub amount: Price,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder        --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub gig_id: GigId,
    pub client_id: UserId,
    pub freelancer_id: UserId,
    pub amount: Price,
}

impl NewOrder {
    pub fn new(gig_id: GigId, client_id: UserId, freelancer_id: UserId, amount: Price) -> Self {
        Self { gig_id, client_id, freelancer_id, amount }
    }
}

//--------------------------------------     OrderDetails      --------------------------------------------------------
/// An order with its gig and both participants resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub id: OrderId,
    pub gig: GigSummary,
    pub client: UserProfile,
    pub freelancer: UserProfile,
    pub amount: Price,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct OrderDetailsRow {
    pub id: OrderId,
    pub amount: Price,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub gig_id: GigId,
    pub gig_title: String,
    pub gig_price: Price,
    pub gig_category: GigCategory,
    pub gig_status: GigStatus,
    pub gig_images: Json<Vec<String>>,
    pub client_id: UserId,
    pub client_name: String,
    pub client_email: String,
    pub freelancer_id: UserId,
    pub freelancer_name: String,
    pub freelancer_email: String,
}

impl From<OrderDetailsRow> for OrderDetails {
    fn from(row: OrderDetailsRow) -> Self {
        Self {
            id: row.id,
            gig: GigSummary {
                id: row.gig_id,
                title: row.gig_title,
                price: row.gig_price,
                category: row.gig_category,
                status: row.gig_status,
                images: row.gig_images.0,
            },
            client: UserProfile { id: row.client_id, name: row.client_name, email: row.client_email },
            freelancer: UserProfile {
                id: row.freelancer_id,
                name: row.freelancer_name,
                email: row.freelancer_email,
            },
            amount: row.amount,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

//--------------------------------------   NotificationType    --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    NewOrder,
    OrderAccepted,
    OrderRejected,
    OrderCompleted,
}

impl NotificationType {
    pub fn title(&self) -> &'static str {
        match self {
            NotificationType::NewOrder => "New Order Received",
            NotificationType::OrderAccepted => "Order Accepted",
            NotificationType::OrderRejected => "Order Rejected",
            NotificationType::OrderCompleted => "Order Completed",
        }
    }
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::NewOrder => write!(f, "new_order"),
            NotificationType::OrderAccepted => write!(f, "order_accepted"),
            NotificationType::OrderRejected => write!(f, "order_rejected"),
            NotificationType::OrderCompleted => write!(f, "order_completed"),
        }
    }
}

//--------------------------------------     Notification      --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    /// The recipient
    pub user_id: UserId,
    #[sqlx(rename = "kind")]
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub order_id: Option<OrderId>,
    pub gig_id: Option<GigId>,
    pub sender_id: Option<UserId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification that has not been stored yet. The order it refers to is attached when it is written, since
/// notifications for new orders are created in the same transaction as the order itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub gig_id: GigId,
    pub sender_id: UserId,
}

//-------------------------------------- NotificationDetails  --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOrderRef {
    pub id: OrderId,
    pub status: OrderStatusType,
    pub amount: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationGigRef {
    pub id: GigId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSenderRef {
    pub id: UserId,
    pub name: String,
}

/// A notification with its order, gig and sender references resolved to their display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDetails {
    pub id: NotificationId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub order: Option<NotificationOrderRef>,
    pub gig: Option<NotificationGigRef>,
    pub sender: Option<NotificationSenderRef>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct NotificationDetailsRow {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub order_id: Option<OrderId>,
    pub order_status: Option<OrderStatusType>,
    pub order_amount: Option<Price>,
    pub gig_id: Option<GigId>,
    pub gig_title: Option<String>,
    pub sender_id: Option<UserId>,
    pub sender_name: Option<String>,
}

impl From<NotificationDetailsRow> for NotificationDetails {
    fn from(row: NotificationDetailsRow) -> Self {
        let order = match (row.order_id, row.order_status, row.order_amount) {
            (Some(id), Some(status), Some(amount)) => Some(NotificationOrderRef { id, status, amount }),
            _ => None,
        };
        let gig = row.gig_id.zip(row.gig_title).map(|(id, title)| NotificationGigRef { id, title });
        let sender = row.sender_id.zip(row.sender_name).map(|(id, name)| NotificationSenderRef { id, name });
        Self {
            id: row.id,
            user_id: row.user_id,
            notification_type: row.kind,
            title: row.title,
            message: row.message,
            order,
            gig,
            sender,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

//--------------------------------------        Review         --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub gig_id: GigId,
    pub user_id: UserId,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub gig_id: GigId,
    pub user_id: UserId,
    pub rating: i64,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetails {
    pub id: ReviewId,
    pub gig_id: GigId,
    pub author: UserProfile,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct ReviewDetailsRow {
    pub id: ReviewId,
    pub gig_id: GigId,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
}

impl From<ReviewDetailsRow> for ReviewDetails {
    fn from(row: ReviewDetailsRow) -> Self {
        Self {
            id: row.id,
            gig_id: row.gig_id,
            author: UserProfile { id: row.user_id, name: row.user_name, email: row.user_email },
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}
