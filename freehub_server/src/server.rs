use std::time::Duration;

use actix_web::{
    dev::{Server, ServiceResponse},
    http::{header, KeepAlive},
    middleware::{Condition, ErrorHandlerResponse, ErrorHandlers, Logger},
    web,
    App,
    HttpServer,
    Scope,
};
use freehub_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    GigApi,
    MarketplaceDatabase,
    NotificationApi,
    OrderFlowApi,
    ReviewApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    auth::TokenIssuer,
    config::{Environment, ServerConfig},
    data_objects::JsonResponse,
    errors::{ServerError, INTERNAL_ERROR_MESSAGE},
    routes::{
        health,
        AcceptOrderRoute,
        CreateGigRoute,
        CreateOrderRoute,
        CreateOrdersRoute,
        DeleteGigRoute,
        FreelancerOrdersRoute,
        GigCategoriesRoute,
        GigReviewsRoute,
        MarkNotificationReadRoute,
        MyGigsRoute,
        MyNotificationsRoute,
        MyOrdersRoute,
        OrderByIdRoute,
        PostReviewRoute,
        PublicGigRoute,
        PublicGigsRoute,
        RejectOrderRoute,
        UnreadCountRoute,
        UpdateGigRoute,
        UpdateGigStatusRoute,
        UpdateOrderStatusRoute,
    },
};

const MAX_DB_CONNECTIONS: u32 = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, MAX_DB_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.skip_migrations {
        warn!("🚀️ Skipping database migrations. The schema must already be up to date.");
    } else {
        db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
        info!("🚀️ Database migrations are up to date");
    }
    let handlers = EventHandlers::new(config.event_buffer_size, relay_hooks());
    let producers = handlers.producers();
    handlers.start_handlers();
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::BackendError(e.to_string()))
}

/// Hooks that hand events over to the realtime delivery layer. For now, delivery is only logged.
pub fn relay_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks
        .on_notification(|ev| {
            Box::pin(async move {
                let n = ev.notification;
                info!("📬️ Relaying {} notification {} to user {}", n.notification_type, n.id, n.user_id);
            })
        })
        .on_order_status_changed(|ev| {
            Box::pin(async move {
                debug!("📬️ Order {} moved from {} to {}", ev.order.id, ev.old_status, ev.new_status());
            })
        });
    hooks
}

pub fn create_server_instance<B>(
    config: ServerConfig,
    db: B,
    producers: EventProducers,
) -> Result<Server, ServerError>
where
    B: MarketplaceDatabase + Send + 'static,
{
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), producers.clone());
        let notifications_api = NotificationApi::new(db.clone());
        let gigs_api = GigApi::new(db.clone());
        let reviews_api = ReviewApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        App::new()
            .wrap(internal_error_filter(config.environment))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("freehub::access_log"))
            .app_data(request_error_handlers())
            .app_data(path_error_handlers())
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(notifications_api))
            .app_data(web::Data::new(gigs_api))
            .app_data(web::Data::new(reviews_api))
            .app_data(web::Data::new(jwt_signer))
            .service(health)
            .service(api_scope::<B>())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Every marketplace route, mounted under `/api`. Routes that need a signed-in user say so by taking a `JwtClaims`
/// argument; the rest are public.
///
/// Routes sharing a prefix with a parameterised route must be registered before it: the notification routes before
/// `/orders/{order_id}`, and the public gig routes before `/gigs/{id}`.
pub fn api_scope<B>() -> Scope
where B: MarketplaceDatabase + 'static {
    web::scope("/api")
        .service(CreateOrderRoute::<B>::new())
        .service(CreateOrdersRoute::<B>::new())
        .service(MyOrdersRoute::<B>::new())
        .service(FreelancerOrdersRoute::<B>::new())
        .service(MyNotificationsRoute::<B>::new())
        .service(UnreadCountRoute::<B>::new())
        .service(MarkNotificationReadRoute::<B>::new())
        .service(OrderByIdRoute::<B>::new())
        .service(UpdateOrderStatusRoute::<B>::new())
        .service(AcceptOrderRoute::<B>::new())
        .service(RejectOrderRoute::<B>::new())
        .service(PublicGigsRoute::<B>::new())
        .service(GigCategoriesRoute::<B>::new())
        .service(PublicGigRoute::<B>::new())
        .service(CreateGigRoute::<B>::new())
        .service(MyGigsRoute::<B>::new())
        .service(UpdateGigRoute::<B>::new())
        .service(DeleteGigRoute::<B>::new())
        .service(UpdateGigStatusRoute::<B>::new())
        .service(PostReviewRoute::<B>::new())
        .service(GigReviewsRoute::<B>::new())
}

/// Outside of development, replaces the body of every 5xx response with a generic message, so that storage and
/// configuration details never reach clients. They are still logged.
pub fn internal_error_filter<B: 'static>(environment: Environment) -> Condition<ErrorHandlers<B>> {
    Condition::new(!environment.is_development(), ErrorHandlers::new().default_handler_server(hide_internal_error))
}

fn hide_internal_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, res) = res.into_parts();
    let body = serde_json::to_string(&JsonResponse::<()>::failure(INTERNAL_ERROR_MESSAGE)).unwrap_or_default();
    let mut res = res.set_body(body);
    res.headers_mut().insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
    let res = ServiceResponse::new(req, res).map_into_boxed_body().map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}

pub fn request_error_handlers() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Could not read request body. {err}");
        ServerError::InvalidRequestBody(format!("Invalid request body. {err}")).into()
    })
}

pub fn path_error_handlers() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        debug!("💻️ Could not read request path. {err}");
        ServerError::InvalidRequestPath(format!("Invalid request path. {err}")).into()
    })
}
