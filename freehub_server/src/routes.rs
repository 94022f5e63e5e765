//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two belong in the engine's
//! `market_api` module, not here. Keep this module neat and tidy 🙏
//!
//! Every handler is generic over the storage backend, and reaches it through one of the engine APIs registered as
//! app data. Database work is asynchronous, so a slow query never ties up a worker thread.
use actix_web::{get, web, HttpResponse, Responder};
use freehub_engine::{
    db_types::{GigId, NotificationId, OrderId},
    GigApi,
    GigManagement,
    NotificationApi,
    NotificationManagement,
    OrderFlowApi,
    OrderManagement,
    ReviewApi,
    ReviewManagement,
    UserManagement,
};
use log::*;

use crate::{
    auth::JwtClaims,
    data_objects::{
        CreateGigRequest,
        CreateOrderRequest,
        CreateOrdersRequest,
        GigStatusRequest,
        JsonResponse,
        PostReviewRequest,
        RejectRequest,
        StatusUpdateRequest,
        UnreadCount,
        UpdateGigRequest,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>); }
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders/create-order" impl OrderManagement, GigManagement, UserManagement);
/// Places an order for a single gig on behalf of the authenticated user.
///
/// The order amount is the gig's current price, and the gig owner is notified of the new order.
pub async fn create_order<B>(
    claims: JwtClaims,
    body: web::Json<CreateOrderRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + GigManagement + UserManagement,
{
    let gig_id = body.into_inner().gig_id;
    debug!("💻️ POST create_order for gig {gig_id} by {}", claims.sub);
    let order = api.place_order(&claims.profile(), gig_id).await?;
    Ok(HttpResponse::Created().json(JsonResponse::data_with_message(order, "Order placed successfully!")))
}

route!(create_orders => Post "/orders/create-orders" impl OrderManagement, GigManagement, UserManagement);
/// Places one order per gig in `gigIds`. Gigs that cannot be ordered are skipped.
pub async fn create_orders<B>(
    claims: JwtClaims,
    body: web::Json<CreateOrdersRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + GigManagement + UserManagement,
{
    let gig_ids = body.into_inner().gig_ids;
    debug!("💻️ POST create_orders for {} gigs by {}", gig_ids.len(), claims.sub);
    let orders = api.place_orders(&claims.profile(), &gig_ids).await?;
    let message = format!("{} order(s) placed successfully!", orders.len());
    Ok(HttpResponse::Created().json(JsonResponse::data_with_message(orders, message)))
}

route!(my_orders => Get "/orders/my-orders" impl OrderManagement, GigManagement, UserManagement);
pub async fn my_orders<B>(claims: JwtClaims, api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError>
where B: OrderManagement + GigManagement + UserManagement {
    debug!("💻️ GET my_orders for {}", claims.sub);
    let orders = api.orders_for_user(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(orders)))
}

route!(freelancer_orders => Get "/orders/freelancer-orders" impl OrderManagement, GigManagement, UserManagement);
pub async fn freelancer_orders<B>(
    claims: JwtClaims,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + GigManagement + UserManagement,
{
    debug!("💻️ GET freelancer_orders for {}", claims.sub);
    let orders = api.orders_for_freelancer(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(orders)))
}

route!(order_by_id => Get "/orders/{order_id}" impl OrderManagement, GigManagement, UserManagement);
pub async fn order_by_id<B>(
    claims: JwtClaims,
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + GigManagement + UserManagement,
{
    let id = path.into_inner();
    debug!("💻️ GET order {id} for {}", claims.sub);
    let order = api.order_for_participant(claims.user_id(), id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(order)))
}

route!(update_order_status => Patch "/orders/{order_id}/status" impl OrderManagement, GigManagement, UserManagement);
/// Sets an order's status directly. Either participant may call this.
pub async fn update_order_status<B>(
    claims: JwtClaims,
    path: web::Path<OrderId>,
    body: web::Json<StatusUpdateRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + GigManagement + UserManagement,
{
    let id = path.into_inner();
    let status = body.into_inner().status;
    debug!("💻️ PATCH order {id} status to {status} by {}", claims.sub);
    let order = api.update_order_status(&claims.profile(), id, status).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(order)))
}

route!(accept_order => Patch "/orders/{order_id}/accept" impl OrderManagement, GigManagement, UserManagement);
pub async fn accept_order<B>(
    claims: JwtClaims,
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + GigManagement + UserManagement,
{
    let id = path.into_inner();
    debug!("💻️ PATCH accept order {id} by {}", claims.sub);
    let order = api.accept_order(&claims.profile(), id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data_with_message(order, "Order accepted successfully")))
}

route!(reject_order => Patch "/orders/{order_id}/reject" impl OrderManagement, GigManagement, UserManagement);
/// Rejects a pending order. The request body is optional; a `reason` in it is passed on to the client.
pub async fn reject_order<B>(
    claims: JwtClaims,
    path: web::Path<OrderId>,
    body: web::Bytes,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + GigManagement + UserManagement,
{
    let id = path.into_inner();
    let reason = RejectRequest::from_optional_body(&body)
        .map_err(|e| ServerError::InvalidRequestBody(format!("Invalid request body. {e}")))?
        .reason;
    debug!("💻️ PATCH reject order {id} by {}", claims.sub);
    let order = api.reject_order(&claims.profile(), id, reason.as_deref()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data_with_message(order, "Order rejected successfully")))
}

//----------------------------------------------   Notifications  ----------------------------------------------
route!(my_notifications => Get "/orders/notifications" impl NotificationManagement);
pub async fn my_notifications<B: NotificationManagement>(
    claims: JwtClaims,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET notifications for {}", claims.sub);
    let notifications = api.notifications_for_user(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(notifications)))
}

route!(mark_notification_read => Patch "/orders/notifications/{id}/read" impl NotificationManagement);
pub async fn mark_notification_read<B: NotificationManagement>(
    claims: JwtClaims,
    path: web::Path<NotificationId>,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PATCH notification {id} read by {}", claims.sub);
    let notification = api.mark_as_read(claims.user_id(), id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(notification)))
}

route!(unread_count => Get "/orders/notifications/unread-count" impl NotificationManagement);
pub async fn unread_count<B: NotificationManagement>(
    claims: JwtClaims,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let count = api.unread_count(claims.user_id()).await?;
    trace!("💻️ {} has {count} unread notifications", claims.sub);
    Ok(HttpResponse::Ok().json(JsonResponse::data(UnreadCount { count })))
}

//----------------------------------------------   Gigs  ----------------------------------------------------
route!(create_gig => Post "/gigs" impl GigManagement, UserManagement);
pub async fn create_gig<B>(
    claims: JwtClaims,
    body: web::Json<CreateGigRequest>,
    api: web::Data<GigApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: GigManagement + UserManagement,
{
    debug!("💻️ POST create_gig by {}", claims.sub);
    let gig = body.into_inner().into_new_gig(claims.user_id());
    let gig = api.create_gig(&claims.profile(), gig).await?;
    Ok(HttpResponse::Created().json(JsonResponse::data_with_message(gig, "Gig created successfully")))
}

route!(my_gigs => Get "/gigs/user/my-gigs" impl GigManagement, UserManagement);
pub async fn my_gigs<B>(claims: JwtClaims, api: web::Data<GigApi<B>>) -> Result<HttpResponse, ServerError>
where B: GigManagement + UserManagement {
    debug!("💻️ GET my_gigs for {}", claims.sub);
    let gigs = api.gigs_for_owner(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(gigs)))
}

route!(update_gig => Put "/gigs/{id}" impl GigManagement, UserManagement);
/// Edits a gig. Only its owner may do this.
pub async fn update_gig<B>(
    claims: JwtClaims,
    path: web::Path<GigId>,
    body: web::Json<UpdateGigRequest>,
    api: web::Data<GigApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: GigManagement + UserManagement,
{
    let id = path.into_inner();
    debug!("💻️ PUT gig {id} by {}", claims.sub);
    let gig = api.update_gig(claims.user_id(), id, body.into_inner().into()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data_with_message(gig, "Gig updated successfully")))
}

route!(delete_gig => Delete "/gigs/{id}" impl GigManagement, UserManagement);
pub async fn delete_gig<B>(
    claims: JwtClaims,
    path: web::Path<GigId>,
    api: web::Data<GigApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: GigManagement + UserManagement,
{
    let id = path.into_inner();
    debug!("💻️ DELETE gig {id} by {}", claims.sub);
    let gig = api.delete_gig(claims.user_id(), id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data_with_message(gig, "Gig deleted successfully")))
}

route!(update_gig_status => Patch "/gigs/{id}/status" impl GigManagement, UserManagement);
pub async fn update_gig_status<B>(
    claims: JwtClaims,
    path: web::Path<GigId>,
    body: web::Json<GigStatusRequest>,
    api: web::Data<GigApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: GigManagement + UserManagement,
{
    let id = path.into_inner();
    let status = body.into_inner().status;
    debug!("💻️ PATCH gig {id} status to {status} by {}", claims.sub);
    let gig = api.update_gig_status(claims.user_id(), id, status).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data_with_message(gig, "Gig status updated successfully")))
}

route!(public_gigs => Get "/gigs/public" impl GigManagement, UserManagement);
pub async fn public_gigs<B>(api: web::Data<GigApi<B>>) -> Result<HttpResponse, ServerError>
where B: GigManagement + UserManagement {
    trace!("💻️ GET public gigs");
    let gigs = api.active_gigs().await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(gigs)))
}

route!(gig_categories => Get "/gigs/public/categories" impl GigManagement, UserManagement);
pub async fn gig_categories<B>(api: web::Data<GigApi<B>>) -> impl Responder
where B: GigManagement + UserManagement {
    trace!("💻️ GET gig categories");
    HttpResponse::Ok().json(JsonResponse::data(api.categories()))
}

route!(public_gig => Get "/gigs/public/{id}" impl GigManagement, UserManagement);
pub async fn public_gig<B>(path: web::Path<GigId>, api: web::Data<GigApi<B>>) -> Result<HttpResponse, ServerError>
where B: GigManagement + UserManagement {
    let id = path.into_inner();
    trace!("💻️ GET public gig {id}");
    let gig = api.public_gig(id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(gig)))
}

//----------------------------------------------   Reviews  ----------------------------------------------------
route!(post_review => Post "/reviews" impl ReviewManagement, GigManagement, UserManagement);
pub async fn post_review<B>(
    claims: JwtClaims,
    body: web::Json<PostReviewRequest>,
    api: web::Data<ReviewApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: ReviewManagement + GigManagement + UserManagement,
{
    let PostReviewRequest { gig_id, rating, comment } = body.into_inner();
    debug!("💻️ POST review for gig {gig_id} by {}", claims.sub);
    let review = api.post_review(&claims.profile(), gig_id, rating, &comment).await?;
    Ok(HttpResponse::Created().json(JsonResponse::data(review)))
}

route!(gig_reviews => Get "/reviews/{gig_id}" impl ReviewManagement, GigManagement, UserManagement);
pub async fn gig_reviews<B>(path: web::Path<GigId>, api: web::Data<ReviewApi<B>>) -> Result<HttpResponse, ServerError>
where B: ReviewManagement + GigManagement + UserManagement {
    let gig_id = path.into_inner();
    trace!("💻️ GET reviews for gig {gig_id}");
    let reviews = api.reviews_for_gig(gig_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::data(reviews)))
}
