//! End-to-end tests for the REST surface.
//!
//! Exercises real Actix handlers with in-memory adapters substituted for
//! PostgreSQL, Google Maps, and SendGrid, so the full request path runs
//! deterministically: token issue and verification, ownership checks, the
//! status state machine, quoting, and notification dispatch.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use courier_backend::domain::{
    AccountService, AdminService, Notifier, ParcelService, ParcelStatus, QuoteCalculator, User,
};
use courier_backend::inbound::http::state::HttpState;
use courier_backend::inbound::http::{TokenCodec, TokenConfig};
use courier_backend::server;
use courier_backend::test_support::{
    test_parcel, test_user, FixedRouteSource, InMemoryParcelRepository, InMemoryUserRepository,
    RecordingMailer,
};

struct TestCtx {
    users: Arc<InMemoryUserRepository>,
    parcels: Arc<InMemoryParcelRepository>,
    mailer: Arc<RecordingMailer>,
    state: web::Data<HttpState>,
}

fn build_ctx() -> TestCtx {
    let users = Arc::new(InMemoryUserRepository::new());
    let parcels = Arc::new(InMemoryParcelRepository::new());
    let mailer = Arc::new(RecordingMailer::new());

    let state = web::Data::new(HttpState::new(
        AccountService::new(users.clone()),
        ParcelService::new(
            parcels.clone(),
            users.clone(),
            QuoteCalculator::offline(),
            Notifier::new(Some(mailer.clone()), "http://localhost:3000"),
        ),
        AdminService::new(users.clone(), parcels.clone()),
        TokenCodec::new(&TokenConfig::hs256("integration-secret")),
    ));

    TestCtx {
        users,
        parcels,
        mailer,
        state,
    }
}

fn bearer(ctx: &TestCtx, user: &User) -> (&'static str, String) {
    let token = ctx.state.tokens.issue(user.id).expect("token issues");
    ("Authorization", format!("Bearer {token}"))
}

macro_rules! app {
    ($ctx:expr) => {
        test::init_service(App::new().configure(server::configure($ctx.state.clone()))).await
    };
}

async fn body_json(res: actix_web::dev::ServiceResponse) -> Value {
    test::read_body_json(res).await
}

#[actix_web::test]
async fn registration_and_login_issue_usable_tokens() {
    let ctx = build_ctx();
    let app = app!(ctx);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "email": "ada@example.com",
                "full_name": "Ada Lovelace",
                "password": "correct horse battery"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    assert_eq!(body["email"], "ada@example.com");
    assert!(body.get("password_hash").is_none());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_form([
                ("username", "ada@example.com"),
                ("password", "correct horse battery"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().expect("token present");

    // The issued token authenticates subsequent requests.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/parcels/")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    let ctx = build_ctx();
    let app = app!(ctx);
    let payload = json!({
        "email": "ada@example.com",
        "full_name": "Ada Lovelace",
        "password": "correct horse battery"
    });

    let first = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = body_json(second).await;
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["message"], "Email already registered");
}

#[actix_web::test]
async fn wrong_credentials_are_unauthorized() {
    let ctx = build_ctx();
    let app = app!(ctx);

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "email": "ada@example.com",
                "full_name": "Ada Lovelace",
                "password": "correct horse battery"
            }))
            .to_request(),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_form([("username", "ada@example.com"), ("password", "nope nope")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(res).await;
    assert_eq!(body["message"], "Incorrect email or password");
}

#[actix_web::test]
async fn parcel_creation_quotes_the_route() {
    let ctx = build_ctx();
    let owner = test_user("owner@example.com", false);
    ctx.users.seed(owner.clone());
    let app = app!(ctx);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/parcels/")
            .insert_header(bearer(&ctx, &owner))
            .set_json(json!({
                "pickup_address": "123 Broadway, New York",
                "destination_address": "456 Fulton St, Brooklyn",
                "pickup_lat": 40.7128,
                "pickup_lng": -74.0060,
                "destination_lat": 40.6782,
                "destination_lng": -73.9442,
                "weight_category": "medium"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    assert_eq!(body["status"], "pending");
    assert!((body["distance_km"].as_f64().expect("distance") - 10.7).abs() < 1e-9);
    assert_eq!(body["duration_mins"], 16);
    assert!((body["quote_amount"].as_f64().expect("quote") - 15.35).abs() < 1e-9);
}

#[actix_web::test]
async fn requests_without_tokens_are_unauthorized() {
    let ctx = build_ctx();
    let app = app!(ctx);

    let res = test::call_service(&app, test::TestRequest::get().uri("/parcels/").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn owners_see_only_their_parcels() {
    let ctx = build_ctx();
    let owner = test_user("owner@example.com", false);
    let stranger = test_user("stranger@example.com", false);
    let admin = test_user("admin@example.com", true);
    ctx.users.seed(owner.clone());
    ctx.users.seed(stranger.clone());
    ctx.users.seed(admin.clone());
    let parcel = test_parcel(owner.id);
    ctx.parcels.seed(parcel.clone());
    ctx.parcels.seed(test_parcel(stranger.id));
    let app = app!(ctx);

    let uri = format!("/parcels/{}", parcel.id);
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&ctx, &stranger))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&ctx, &owner))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // Owner listing holds exactly their parcel.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/parcels/")
            .insert_header(bearer(&ctx, &owner))
            .to_request(),
    )
    .await;
    let body = body_json(res).await;
    assert_eq!(body.as_array().expect("array").len(), 1);

    // The admin listing holds everything; non-admins may not use it.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/parcels/all")
            .insert_header(bearer(&ctx, &owner))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/parcels/all")
            .insert_header(bearer(&ctx, &admin))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body.as_array().expect("array").len(), 2);
}

#[actix_web::test]
async fn status_updates_follow_the_state_machine() {
    let ctx = build_ctx();
    let owner = test_user("owner@example.com", false);
    let admin = test_user("admin@example.com", true);
    ctx.users.seed(owner.clone());
    ctx.users.seed(admin.clone());
    let parcel = test_parcel(owner.id);
    ctx.parcels.seed(parcel.clone());
    let app = app!(ctx);

    let uri = format!("/parcels/{}/admin", parcel.id);

    // Jumping straight to delivered is rejected.
    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&ctx, &admin))
            .set_json(json!({"status": "delivered"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["message"], "Cannot move parcel from pending to delivered");
    assert!(ctx.mailer.sent().is_empty());

    // The legal path works and notifies at each step.
    for status in ["in_transit", "delivered"] {
        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header(bearer(&ctx, &admin))
                .set_json(json!({"status": status}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
    assert_eq!(ctx.mailer.sent().len(), 2);

    // Owners may not drive the admin endpoint.
    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&ctx, &owner))
            .set_json(json!({"status": "cancelled"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn location_changes_notify_once_per_actual_change() {
    let ctx = build_ctx();
    let owner = test_user("owner@example.com", false);
    let admin = test_user("admin@example.com", true);
    ctx.users.seed(owner.clone());
    ctx.users.seed(admin.clone());
    let parcel = test_parcel(owner.id);
    ctx.parcels.seed(parcel.clone());
    let app = app!(ctx);

    let uri = format!("/parcels/{}/admin", parcel.id);
    for _ in 0..2 {
        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header(bearer(&ctx, &admin))
                .set_json(json!({"present_location": "Newark hub"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    // Second write carried the same value, so only one email went out.
    let sent = ctx.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html_body.contains("Newark hub"));
    assert!(sent[0]
        .html_body
        .contains(&format!("http://localhost:3000/parcel/{}", parcel.id)));
}

#[actix_web::test]
async fn cancellation_is_idempotent_and_delivered_is_final() {
    let ctx = build_ctx();
    let owner = test_user("owner@example.com", false);
    ctx.users.seed(owner.clone());
    let parcel = test_parcel(owner.id);
    ctx.parcels.seed(parcel.clone());
    let mut delivered = test_parcel(owner.id);
    delivered.status = ParcelStatus::Delivered;
    ctx.parcels.seed(delivered.clone());
    let app = app!(ctx);

    let uri = format!("/parcels/{}/cancel", parcel.id);
    for _ in 0..2 {
        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header(bearer(&ctx, &owner))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["status"], "cancelled");
    }

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/parcels/{}/cancel", delivered.id))
            .insert_header(bearer(&ctx, &owner))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["message"], "Cannot cancel delivered parcel");
}

#[actix_web::test]
async fn destination_updates_validate_coordinate_pairs() {
    let ctx = build_ctx();
    let owner = test_user("owner@example.com", false);
    ctx.users.seed(owner.clone());
    let parcel = test_parcel(owner.id);
    ctx.parcels.seed(parcel.clone());
    let app = app!(ctx);

    let uri = format!("/parcels/{}/destination", parcel.id);

    // One coordinate without the other is malformed.
    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&ctx, &owner))
            .set_json(json!({"destination_lat": 40.6602}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // A blank address may not overwrite the stored one.
    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&ctx, &owner))
            .set_json(json!({"destination_address": "   "}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["message"], "destination_address must not be empty");

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&ctx, &owner))
            .set_json(json!({
                "destination_address": "789 Flatbush Ave",
                "destination_lat": 40.6602,
                "destination_lng": -73.9690
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["destination_address"], "789 Flatbush Ave");
    assert_ne!(body["quote_amount"], json!(parcel.quote_amount));
}

#[actix_web::test]
async fn route_endpoint_reports_provider_figures() {
    let mut ctx = build_ctx();
    // Swap in a provider-backed calculator for this test.
    let source = Arc::new(FixedRouteSource {
        leg: courier_backend::domain::ports::RouteLeg {
            distance_meters: 42_000,
            duration_seconds: 3_659,
        },
        polyline: Some("a~l~Fjk~uOwHJy@P".to_owned()),
    });
    ctx.state = web::Data::new(HttpState::new(
        AccountService::new(ctx.users.clone()),
        ParcelService::new(
            ctx.parcels.clone(),
            ctx.users.clone(),
            QuoteCalculator::new(Some(source)),
            Notifier::disabled("http://localhost:3000"),
        ),
        AdminService::new(ctx.users.clone(), ctx.parcels.clone()),
        TokenCodec::new(&TokenConfig::hs256("integration-secret")),
    ));
    let owner = test_user("owner@example.com", false);
    ctx.users.seed(owner.clone());
    let parcel = test_parcel(owner.id);
    ctx.parcels.seed(parcel.clone());
    let app = app!(ctx);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/parcels/{}/route", parcel.id))
            .insert_header(bearer(&ctx, &owner))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert!((body["distance_km"].as_f64().expect("distance") - 42.0).abs() < 1e-9);
    assert_eq!(body["duration_mins"], 60);
    assert_eq!(body["polyline"], "a~l~Fjk~uOwHJy@P");
}

#[actix_web::test]
async fn unknown_parcels_are_not_found() {
    let ctx = build_ctx();
    let owner = test_user("owner@example.com", false);
    ctx.users.seed(owner.clone());
    let app = app!(ctx);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/parcels/{}", Uuid::new_v4()))
            .insert_header(bearer(&ctx, &owner))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn admin_surface_reports_users_and_stats() {
    let ctx = build_ctx();
    let owner = test_user("owner@example.com", false);
    let admin = test_user("admin@example.com", true);
    ctx.users.seed(owner.clone());
    ctx.users.seed(admin.clone());
    ctx.parcels.seed(test_parcel(owner.id));
    let mut delivered = test_parcel(owner.id);
    delivered.status = ParcelStatus::Delivered;
    ctx.parcels.seed(delivered);
    let app = app!(ctx);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/users")
            .insert_header(bearer(&ctx, &owner))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = body_json(res).await;
    assert_eq!(body["message"], "Admin access required");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/users")
            .insert_header(bearer(&ctx, &admin))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body.as_array().expect("array").len(), 2);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/admin/database-stats")
            .insert_header(bearer(&ctx, &admin))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["total_users"], 2);
    assert_eq!(body["admin_users"], 1);
    assert_eq!(body["total_parcels"], 2);
    assert_eq!(body["pending_parcels"], 1);
    assert_eq!(body["delivered_parcels"], 1);
}
