use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use freehub_engine::{
    db_types::{Gig, GigId, GigStatus, Price, Review, ReviewId, UserId},
    GigApi,
    GigDeletion,
    ReviewApi,
    StorageError,
};
use serde_json::json;

use super::{
    helpers::{alice, authed, bob, logo_gig, send_request, send_request_in, timestamp},
    mocks::MockMarketplace,
};
use crate::{config::Environment, routes::health, server::api_scope};

fn configure(gigs: MockMarketplace, reviews: MockMarketplace) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(GigApi::new(gigs)))
            .app_data(web::Data::new(ReviewApi::new(reviews)))
            .service(health)
            .service(api_scope::<MockMarketplace>());
    }
}

fn new_gig_json(price: f64) -> serde_json::Value {
    json!({
        "title": "Logo design",
        "description": "A logo for your brand",
        "price": price,
        "deliveryTime": 3,
        "category": "graphic-design",
        "images": ["uploads/logo.png"]
    })
}

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/health");
    let (status, body) = send_request(req, configure(MockMarketplace::new(), MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("👍️\n"));
}

#[actix_web::test]
async fn categories_are_public() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/gigs/public/categories");
    let (status, body) = send_request(req, configure(MockMarketplace::new(), MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::OK);
    let categories = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(categories.len(), 8);
    assert_eq!(categories[0], "web-development");
}

#[actix_web::test]
async fn public_gig_counts_a_view() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_increment_gig_views()
        .withf(|id| *id == GigId(10))
        .times(1)
        .returning(|_| Ok(Some(logo_gig())));
    let req = TestRequest::get().uri("/api/gigs/public/10");
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Logo design");
    assert_eq!(body["data"]["price"], 25.0);
}

#[actix_web::test]
async fn public_gig_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_increment_gig_views().returning(|_| Ok(None));
    let req = TestRequest::get().uri("/api/gigs/public/99");
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Gig not found"}));
}

#[actix_web::test]
async fn storage_errors_are_not_leaked() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_increment_gig_views().returning(|_| Err(StorageError::QueryError("disk I/O error at /var/db".into())));
    let req = TestRequest::get().uri("/api/gigs/public/10");
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "message": "Internal server error"}));
}

#[actix_web::test]
async fn development_mode_shows_internal_errors() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_increment_gig_views().returning(|_| Err(StorageError::QueryError("disk I/O error at /var/db".into())));
    let req = TestRequest::get().uri("/api/gigs/public/10");
    let (status, body) =
        send_request_in(Environment::Development, req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains("disk I/O error at /var/db"), "{message}");
}

#[actix_web::test]
async fn public_gig_listing() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_fetch_gigs_with_status()
        .withf(|status| *status == GigStatus::Active)
        .times(1)
        .returning(|_| Ok(vec![logo_gig()]));
    let req = TestRequest::get().uri("/api/gigs/public");
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], 10);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn create_gig() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_upsert_user().returning(|_| Ok(()));
    db.expect_insert_gig()
        .withf(|g| g.created_by == UserId(2) && g.price == Price::from(2500))
        .times(1)
        .returning(|_| Ok(logo_gig()));
    let req = authed(TestRequest::post().uri("/api/gigs"), &bob()).set_json(new_gig_json(25.0));
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Gig created successfully");
    assert_eq!(body["data"]["status"], "active");
}

#[actix_web::test]
async fn minimum_price_is_five_dollars() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_upsert_user().returning(|_| Ok(()));
    db.expect_insert_gig()
        .withf(|g| g.price == Price::from(500))
        .times(1)
        .returning(|g| Ok(Gig { price: g.price, ..logo_gig() }));
    let req = authed(TestRequest::post().uri("/api/gigs"), &bob()).set_json(new_gig_json(5.0));
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["price"], 5.0);
}

#[actix_web::test]
async fn create_gig_below_minimum_price() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_insert_gig().never();
    let req = authed(TestRequest::post().uri("/api/gigs"), &bob()).set_json(new_gig_json(4.99));
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Price must be at least $5.00");
}

#[actix_web::test]
async fn only_the_owner_updates_gig_status() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_fetch_gig().returning(|_| Ok(Some(logo_gig())));
    db.expect_update_gig_status().never();
    let req = authed(TestRequest::patch().uri("/api/gigs/10/status"), &alice()).set_json(json!({"status": "paused"}));
    let (status, _) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn owner_pauses_gig() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_fetch_gig().returning(|_| Ok(Some(logo_gig())));
    db.expect_update_gig_status()
        .withf(|_, status| *status == GigStatus::Paused)
        .times(1)
        .returning(|_, status| Ok(Some(Gig { status, ..logo_gig() })));
    let req = authed(TestRequest::patch().uri("/api/gigs/10/status"), &bob()).set_json(json!({"status": "paused"}));
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "paused");
}

#[actix_web::test]
async fn owner_edits_gig() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_fetch_gig().returning(|_| Ok(Some(logo_gig())));
    db.expect_update_gig()
        .withf(|id, u| {
            *id == GigId(10) &&
                u.title == "Logo design" &&
                u.price == Price::from(3000) &&
                u.images == vec!["uploads/logo.png".to_string(), "uploads/logo-2.png".to_string()]
        })
        .times(1)
        .returning(|_, u| Ok(Some(Gig { price: u.price, images: u.images, ..logo_gig() })));
    let req = authed(TestRequest::put().uri("/api/gigs/10"), &bob())
        .set_json(json!({"price": 30, "images": ["uploads/logo-2.png"]}));
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Gig updated successfully");
    assert_eq!(body["data"]["price"], 30.0);
}

#[actix_web::test]
async fn only_the_owner_edits_gig() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_fetch_gig().returning(|_| Ok(Some(logo_gig())));
    db.expect_update_gig().never();
    let req = authed(TestRequest::put().uri("/api/gigs/10"), &alice()).set_json(json!({"title": "Mine now"}));
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized to update this gig");
}

#[actix_web::test]
async fn edits_must_keep_an_image() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_fetch_gig().returning(|_| Ok(Some(logo_gig())));
    db.expect_update_gig().never();
    let req = authed(TestRequest::put().uri("/api/gigs/10"), &bob()).set_json(json!({"keepExistingImages": false}));
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "At least one image is required");
}

#[actix_web::test]
async fn owner_deletes_gig() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_fetch_gig().returning(|_| Ok(Some(logo_gig())));
    db.expect_delete_gig().withf(|id| *id == GigId(10)).times(1).returning(|_| Ok(GigDeletion::Deleted));
    let req = authed(TestRequest::delete().uri("/api/gigs/10"), &bob());
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Gig deleted successfully");
    assert_eq!(body["data"]["id"], 10);
}

#[actix_web::test]
async fn ordered_gigs_are_not_deleted() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_fetch_gig().returning(|_| Ok(Some(logo_gig())));
    db.expect_delete_gig().times(1).returning(|_| Ok(GigDeletion::HasOrders));
    let req = authed(TestRequest::delete().uri("/api/gigs/10"), &bob());
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Gigs that have orders cannot be deleted");
}

#[actix_web::test]
async fn only_the_owner_deletes_gig() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_fetch_gig().returning(|_| Ok(Some(logo_gig())));
    db.expect_delete_gig().never();
    let req = authed(TestRequest::delete().uri("/api/gigs/10"), &alice());
    let (status, body) = send_request(req, configure(db, MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized to delete this gig");
}

#[actix_web::test]
async fn post_review() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_fetch_gig().returning(|_| Ok(Some(logo_gig())));
    db.expect_upsert_user().returning(|_| Ok(()));
    db.expect_insert_review().withf(|r| r.rating == 4 && r.user_id == UserId(1)).times(1).returning(|r| {
        Ok(Review {
            id: ReviewId(1),
            gig_id: r.gig_id,
            user_id: r.user_id,
            rating: r.rating,
            comment: r.comment,
            created_at: timestamp(),
        })
    });
    let req = authed(TestRequest::post().uri("/api/reviews"), &alice())
        .set_json(json!({"gigId": 10, "rating": 4, "comment": "Great work"}));
    let (status, body) = send_request(req, configure(MockMarketplace::new(), db)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["rating"], 4);
    assert_eq!(body["data"]["comment"], "Great work");
}

#[actix_web::test]
async fn review_rating_out_of_range() {
    let _ = env_logger::try_init().ok();
    let req = authed(TestRequest::post().uri("/api/reviews"), &alice())
        .set_json(json!({"gigId": 10, "rating": 6, "comment": "Great work"}));
    let (status, body) = send_request(req, configure(MockMarketplace::new(), MockMarketplace::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Rating must be between 1 and 5");
}

#[actix_web::test]
async fn reviews_are_public() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplace::new();
    db.expect_fetch_reviews_for_gig().withf(|id| *id == GigId(10)).returning(|_| Ok(vec![]));
    let req = TestRequest::get().uri("/api/reviews/10");
    let (status, body) = send_request(req, configure(MockMarketplace::new(), db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": []}));
}
