use std::fmt::Display;

use freehub_engine::db_types::{GigCategory, GigChanges, GigId, GigStatus, NewGig, OrderStatusType, Price, UserId};
use serde::{Deserialize, Serialize};

/// The envelope every API response is wrapped in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> JsonResponse<T> {
    pub fn data(data: T) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    pub fn data_with_message<S: Display>(data: T, message: S) -> Self {
        Self { success: true, data: Some(data), message: Some(message.to_string()) }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, data: None, message: Some(message.to_string()) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub gig_id: GigId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrdersRequest {
    #[serde(default)]
    pub gig_ids: Vec<GigId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatusType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

impl RejectRequest {
    /// The rejection body is optional. A missing or blank body means no reason was given, but a body that is present
    /// must be valid.
    pub fn from_optional_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GigStatusRequest {
    pub status: GigStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGigRequest {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub delivery_time: i64,
    pub category: GigCategory,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateGigRequest {
    pub fn into_new_gig(self, owner: UserId) -> NewGig {
        NewGig {
            title: self.title,
            description: self.description,
            price: self.price,
            delivery_time: self.delivery_time,
            category: self.category,
            images: self.images,
            created_by: owner,
        }
    }
}

/// An edit of a gig. Omitted fields are left as they are.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGigRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub delivery_time: Option<i64>,
    #[serde(default)]
    pub category: Option<GigCategory>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_keep_existing_images")]
    pub keep_existing_images: bool,
}

fn default_keep_existing_images() -> bool {
    true
}

impl From<UpdateGigRequest> for GigChanges {
    fn from(req: UpdateGigRequest) -> Self {
        GigChanges {
            title: req.title,
            description: req.description,
            price: req.price,
            delivery_time: req.delivery_time,
            category: req.category,
            images: req.images,
            keep_existing_images: req.keep_existing_images,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostReviewRequest {
    pub gig_id: GigId,
    pub rating: i64,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: i64,
}
