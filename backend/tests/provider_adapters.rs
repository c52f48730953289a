//! End-to-end tests for the provider HTTP adapters.
//!
//! Runs a local actix server playing the provider role so the reqwest
//! adapters exercise their real request construction, status mapping,
//! timeout classification, and payload decoding.

use std::collections::HashMap;
use std::net::TcpListener;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::json;

use courier_backend::domain::ports::{
    EmailMessage, Mailer, MailerError, RouteSource, RouteSourceError,
};
use courier_backend::domain::{EmailAddress, LatLng};
use courier_backend::outbound::email::SendGridMailer;
use courier_backend::outbound::maps::GoogleMapsSource;

const API_KEY: &str = "test-key";

async fn matrix_ok(query: web::Query<HashMap<String, String>>) -> HttpResponse {
    let param = |name: &str| query.get(name).map(String::as_str);
    if param("key") != Some(API_KEY)
        || param("mode") != Some("driving")
        || param("units") != Some("metric")
        || param("origins").is_none()
        || param("destinations").is_none()
    {
        return HttpResponse::BadRequest().finish();
    }
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "rows": [{"elements": [{
            "status": "OK",
            "distance": {"text": "10.7 km", "value": 10_700},
            "duration": {"text": "16 mins", "value": 962}
        }]}]
    }))
}

async fn matrix_slow() -> HttpResponse {
    tokio::time::sleep(Duration::from_secs(2)).await;
    HttpResponse::Ok().json(json!({"status": "OK", "rows": []}))
}

async fn matrix_garbage() -> HttpResponse {
    HttpResponse::Ok().body("not json at all")
}

async fn directions_zero_results() -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "ZERO_RESULTS", "routes": []}))
}

async fn mail_send(req: HttpRequest, payload: web::Json<serde_json::Value>) -> HttpResponse {
    let authorised = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some("Bearer test-key");
    let addressed = payload["personalizations"][0]["to"][0]["email"] == "owner@example.com";
    if authorised && addressed {
        HttpResponse::Accepted().finish()
    } else {
        HttpResponse::InternalServerError().body("stub saw a malformed send request")
    }
}

async fn mail_reject() -> HttpResponse {
    HttpResponse::BadRequest().body("does not match a verified Sender Identity")
}

fn provider_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/matrix/ok", web::get().to(matrix_ok))
        .route("/matrix/slow", web::get().to(matrix_slow))
        .route(
            "/matrix/denied",
            web::get().to(|| async { HttpResponse::Forbidden().finish() }),
        )
        .route(
            "/matrix/broken",
            web::get().to(|| async { HttpResponse::InternalServerError().finish() }),
        )
        .route("/matrix/garbage", web::get().to(matrix_garbage))
        .route("/directions/zero", web::get().to(directions_zero_results))
        .route("/mail/send", web::post().to(mail_send))
        .route("/mail/reject", web::post().to(mail_reject));
}

struct StubProvider {
    base_url: String,
    handle: ServerHandle,
}

impl StubProvider {
    fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("stub address");
        let server = HttpServer::new(|| App::new().configure(provider_routes))
            .workers(1)
            .listen(listener)
            .expect("stub listens")
            .run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn stop(self) {
        self.handle.stop(true).await;
    }
}

fn maps_source(stub: &StubProvider, matrix_path: &str, timeout: Duration) -> GoogleMapsSource {
    GoogleMapsSource::new(API_KEY, timeout)
        .expect("client builds")
        .with_endpoints(stub.url(matrix_path), stub.url("/directions/zero"))
}

fn coords() -> (LatLng, LatLng) {
    (
        LatLng::new(40.7128, -74.0060).expect("valid coordinates"),
        LatLng::new(40.6782, -73.9442).expect("valid coordinates"),
    )
}

fn message() -> EmailMessage {
    EmailMessage {
        to: EmailAddress::new("owner@example.com").expect("valid address"),
        subject: "Parcel update".to_owned(),
        html_body: "<p>On its way.</p>".to_owned(),
    }
}

#[actix_web::test]
async fn distance_matrix_round_trips_provider_figures() {
    let stub = StubProvider::start();
    let source = maps_source(&stub, "/matrix/ok", Duration::from_secs(5));
    let (origin, destination) = coords();

    let leg = source
        .distance_matrix(origin, destination)
        .await
        .expect("leg decodes");

    assert_eq!(leg.distance_meters, 10_700);
    assert_eq!(leg.duration_seconds, 962);
    stub.stop().await;
}

#[actix_web::test]
async fn zero_results_directions_yield_no_polyline() {
    let stub = StubProvider::start();
    let source = maps_source(&stub, "/matrix/ok", Duration::from_secs(5));
    let (origin, destination) = coords();

    let polyline = source
        .route_polyline(origin, destination)
        .await
        .expect("zero results is not an error");

    assert_eq!(polyline, None);
    stub.stop().await;
}

#[actix_web::test]
async fn denied_requests_map_to_invalid_request() {
    let stub = StubProvider::start();
    let source = maps_source(&stub, "/matrix/denied", Duration::from_secs(5));
    let (origin, destination) = coords();

    let err = source
        .distance_matrix(origin, destination)
        .await
        .expect_err("denied");

    assert!(matches!(err, RouteSourceError::InvalidRequest { .. }));
    stub.stop().await;
}

#[actix_web::test]
async fn provider_failures_map_to_transport() {
    let stub = StubProvider::start();
    let source = maps_source(&stub, "/matrix/broken", Duration::from_secs(5));
    let (origin, destination) = coords();

    let err = source
        .distance_matrix(origin, destination)
        .await
        .expect_err("broken");

    assert!(matches!(err, RouteSourceError::Transport { .. }));
    stub.stop().await;
}

#[actix_web::test]
async fn unparseable_bodies_map_to_decode_errors() {
    let stub = StubProvider::start();
    let source = maps_source(&stub, "/matrix/garbage", Duration::from_secs(5));
    let (origin, destination) = coords();

    let err = source
        .distance_matrix(origin, destination)
        .await
        .expect_err("garbage");

    assert!(matches!(err, RouteSourceError::Decode { .. }));
    stub.stop().await;
}

#[actix_web::test]
async fn slow_providers_are_classified_as_timeouts() {
    let stub = StubProvider::start();
    let source = maps_source(&stub, "/matrix/slow", Duration::from_millis(100));
    let (origin, destination) = coords();

    let err = source
        .distance_matrix(origin, destination)
        .await
        .expect_err("timed out");

    assert!(matches!(err, RouteSourceError::Timeout { .. }));
    stub.stop().await;
}

#[actix_web::test]
async fn accepted_mail_resolves_ok() {
    let stub = StubProvider::start();
    // The stub only answers 202 to a correctly authorised and addressed
    // request, so success here also covers the request shape.
    let mailer = SendGridMailer::new(API_KEY, "notifications@courier.example", Duration::from_secs(5))
        .expect("client builds")
        .with_endpoint(stub.url("/mail/send"));

    mailer.send(message()).await.expect("accepted");
    stub.stop().await;
}

#[actix_web::test]
async fn rejected_mail_surfaces_status_and_body() {
    let stub = StubProvider::start();
    let mailer = SendGridMailer::new(API_KEY, "notifications@courier.example", Duration::from_secs(5))
        .expect("client builds")
        .with_endpoint(stub.url("/mail/reject"));

    let err = mailer.send(message()).await.expect_err("rejected");

    match err {
        MailerError::Rejected { message } => {
            assert!(message.contains("400"));
            assert!(message.contains("verified Sender Identity"));
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
    stub.stop().await;
}
