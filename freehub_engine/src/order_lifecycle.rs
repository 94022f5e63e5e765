//! # Order lifecycle
//!
//! Every change to an order's status goes through [`transition`]. It decides, from the current status, the
//! requested action and the role of the caller, what the next status is and which notification (if any) the client
//! should receive. The accept, reject and generic status update flows are all thin callers of this one function.
//!
//! | Action      | Caller                | Precondition | Next          | Notification     |
//! |-------------|-----------------------|--------------|---------------|------------------|
//! | `Accept`    | freelancer            | `pending`    | `in-progress` | `order_accepted` |
//! | `Reject`    | freelancer            | `pending`    | `cancelled`   | `order_rejected` |
//! | `SetStatus` | client or freelancer  | none         | any           | by target status |
//!
//! Notifications for status changes always go to the client.
use std::fmt::Display;

use thiserror::Error;

use crate::db_types::{GigId, NewNotification, NotificationType, Order, OrderStatusType, UserId, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Accept,
    Reject,
    /// Set the status to the given value, regardless of the current status.
    SetStatus(OrderStatusType),
}

impl Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderAction::Accept => write!(f, "accept"),
            OrderAction::Reject => write!(f, "reject"),
            OrderAction::SetStatus(s) => write!(f, "set status to {s}"),
        }
    }
}

/// The relationship between a user and an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRole {
    Client,
    Freelancer,
    Outsider,
}

impl ParticipantRole {
    pub fn of(order: &Order, user: UserId) -> Self {
        if order.freelancer_id == user {
            Self::Freelancer
        } else if order.client_id == user {
            Self::Client
        } else {
            Self::Outsider
        }
    }

    pub fn is_participant(&self) -> bool {
        !matches!(self, Self::Outsider)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: OrderStatusType,
    pub next: OrderStatusType,
    pub notification: Option<NotificationType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Only the client or the freelancer may update this order")]
    NotParticipant,
    #[error("Only the freelancer may {0} this order")]
    FreelancerOnly(OrderAction),
    #[error("Order is not in pending status (it is {0})")]
    NotPending(OrderStatusType),
}

pub fn transition(
    current: OrderStatusType,
    action: OrderAction,
    role: ParticipantRole,
) -> Result<Transition, LifecycleError> {
    if !role.is_participant() {
        return Err(LifecycleError::NotParticipant);
    }
    let next = match action {
        OrderAction::Accept | OrderAction::Reject => {
            if role != ParticipantRole::Freelancer {
                return Err(LifecycleError::FreelancerOnly(action));
            }
            if current != OrderStatusType::Pending {
                return Err(LifecycleError::NotPending(current));
            }
            if action == OrderAction::Accept {
                OrderStatusType::InProgress
            } else {
                OrderStatusType::Cancelled
            }
        },
        OrderAction::SetStatus(status) => status,
    };
    Ok(Transition { from: current, next, notification: notification_for_status(next) })
}

/// The notification the client receives when an order moves into `status`.
pub fn notification_for_status(status: OrderStatusType) -> Option<NotificationType> {
    match status {
        OrderStatusType::Pending => None,
        OrderStatusType::InProgress => Some(NotificationType::OrderAccepted),
        OrderStatusType::Cancelled => Some(NotificationType::OrderRejected),
        OrderStatusType::Completed => Some(NotificationType::OrderCompleted),
    }
}

/// Renders the message body for a lifecycle notification.
///
/// `reason` is only used for rejections, and is appended verbatim when it is present and non-empty.
pub fn render_message(kind: NotificationType, gig_title: &str, actor_name: &str, reason: Option<&str>) -> String {
    match kind {
        NotificationType::NewOrder => {
            format!("You have received a new order for \"{gig_title}\" from {actor_name}")
        },
        NotificationType::OrderAccepted => {
            format!("Your order for \"{gig_title}\" has been accepted by {actor_name}")
        },
        NotificationType::OrderRejected => match reason.filter(|r| !r.is_empty()) {
            Some(reason) => format!("Your order for \"{gig_title}\" has been rejected by {actor_name}: {reason}"),
            None => format!("Your order for \"{gig_title}\" has been rejected by {actor_name}"),
        },
        NotificationType::OrderCompleted => {
            format!("Your order for \"{gig_title}\" has been completed by {actor_name}")
        },
    }
}

/// Builds the `new_order` notification addressed to the gig owner.
pub fn new_order_notification(
    gig_id: GigId,
    gig_title: &str,
    freelancer: UserId,
    client: &UserProfile,
) -> NewNotification {
    let kind = NotificationType::NewOrder;
    NewNotification {
        user_id: freelancer,
        notification_type: kind,
        title: kind.title().to_string(),
        message: render_message(kind, gig_title, &client.name, None),
        gig_id,
        sender_id: client.id,
    }
}

/// Builds a status-change notification addressed to the order's client.
pub fn status_notification(
    kind: NotificationType,
    order: &Order,
    gig_title: &str,
    actor: &UserProfile,
    reason: Option<&str>,
) -> NewNotification {
    NewNotification {
        user_id: order.client_id,
        notification_type: kind,
        title: kind.title().to_string(),
        message: render_message(kind, gig_title, &actor.name, reason),
        gig_id: order.gig_id,
        sender_id: actor.id,
    }
}
