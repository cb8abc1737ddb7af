use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use wiza_core::config::AppConfig;
use wiza_core::models::checkin::ScanResult;
use wiza_core::routes;
use wiza_core::services::checkin_service::ScanDecoder;
use wiza_core::services::notification_service::{
    NotificationError, NotificationMessage, NotificationPriority, NotificationService, Recipient,
};
use wiza_core::state::AppState;
use wiza_core::utils::clock::SystemClock;

// ── Mocks ──

#[derive(Default)]
struct RecordingNotifications {
    sent: Mutex<Vec<(Recipient, NotificationMessage)>>,
}

#[async_trait]
impl NotificationService for RecordingNotifications {
    async fn send(&self, recipient: &Recipient, message: NotificationMessage) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push((recipient.clone(), message));
        Ok(())
    }
}

struct FixedDecoder(ScanResult);

impl ScanDecoder for FixedDecoder {
    fn decode(&mut self) -> ScanResult {
        self.0.clone()
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        scan_delay: Duration::from_millis(10),
        ..AppConfig::default()
    }
}

fn test_app_with(scan: ScanResult) -> (Router, Arc<RecordingNotifications>) {
    let notifications = Arc::new(RecordingNotifications::default());
    let state = AppState::with_services(
        test_config(),
        Arc::new(SystemClock),
        notifications.clone(),
        Box::new(FixedDecoder(scan)),
    );
    (routes::router(Arc::new(state)), notifications)
}

fn test_app() -> (Router, Arc<RecordingNotifications>) {
    test_app_with(ScanResult::Passenger {
        name: "Maria Santos".to_string(),
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap()
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(request).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// ── Driver ──

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let (status, body) = call(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_status_cycle() {
    let (app, _) = test_app();

    let (_, body) = call(&app, get("/driver/status")).await;
    assert_eq!(body["status"], "available");
    assert_eq!(body["label"], "Disponível (A Lotar)");

    let (status, body) = call(&app, post_empty("/driver/status/cycle")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "on_way");
    assert_eq!(body["seconds_in_status"], 0);

    let (status, body) = call(&app, send_json("PUT", "/driver/status", json!({ "status": "busy" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "busy");
}

#[tokio::test]
async fn test_trip_lifecycle_over_http() {
    let (app, notifications) = test_app();

    let (status, request) = call(
        &app,
        send_json(
            "POST",
            "/driver/requests",
            json!({
                "origin": "Maianga",
                "destination": "Miramar",
                "estimated_time_min": 8,
                "passengers": 2,
                "payment_method": "wiza_tds",
                "quoted_price": 850
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = request["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("trp-"));

    let (status, active) = call(&app, post_empty(&format!("/driver/requests/{id}/accept"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["request"]["status"], "accepted");

    let (status, body) = call(&app, send_json("PUT", "/driver/status", json!({ "status": "available" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_status_transition");

    let (status, _) = call(&app, post_empty("/driver/trip/boarded")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, get("/driver/status")).await;
    assert_eq!(body["status"], "busy");

    let (status, completed) = call(&app, post_empty("/driver/trip/complete")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["request"]["id"], id.as_str());

    let (status, _) = call(&app, get("/driver/trip")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let sent = notifications.sent.lock().unwrap();
    let titles: Vec<_> = sent.iter().map(|(_, m)| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Viagem Confirmada!", "Viagem Concluída"]);
    assert!(sent.iter().all(|(r, _)| *r == Recipient::Passenger));
}

#[tokio::test]
async fn test_unknown_request_and_rejection() {
    let (app, _) = test_app();

    let (status, body) = call(&app, post_empty("/driver/requests/trp-250101-zzzzz/accept")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "trip_request_not_found");

    let (_, request) = call(
        &app,
        send_json(
            "POST",
            "/driver/requests",
            json!({
                "origin": "Viana",
                "destination": "Talatona",
                "estimated_time_min": 15,
                "passengers": 1,
                "payment_method": "cash",
                "quoted_price": 1200
            }),
        ),
    )
    .await;
    let id = request["id"].as_str().unwrap();

    let (status, body) = call(
        &app,
        send_json("POST", &format!("/driver/requests/{id}/reject"), json!({ "reason": "Táxi cheio" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");

    let (_, pending) = call(&app, get("/driver/requests")).await;
    assert_eq!(pending.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_accepting_tds_trip_debits_wallet() {
    let (app, _) = test_app();
    let booking = |price: i64| {
        send_json(
            "POST",
            "/driver/requests",
            json!({
                "origin": "Cacuaco",
                "destination": "Centro",
                "estimated_time_min": 25,
                "passengers": 3,
                "payment_method": "wiza_tds",
                "quoted_price": price
            }),
        )
    };

    let (_, expensive) = call(&app, booking(5000)).await;
    let id = expensive["id"].as_str().unwrap();
    let (status, body) = call(&app, post_empty(&format!("/driver/requests/{id}/accept"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "insufficient_balance");
    let (_, body) = call(&app, get("/driver/status")).await;
    assert_eq!(body["status"], "available");

    let (_, affordable) = call(&app, booking(1500)).await;
    let id = affordable["id"].as_str().unwrap();
    let (status, _) = call(&app, post_empty(&format!("/driver/requests/{id}/accept"))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, wallet) = call(&app, get("/wallet")).await;
    assert_eq!(wallet["balance"], 950);
    assert_eq!(wallet["transactions"][0]["kind"], "payment");
    assert_eq!(wallet["transactions"][0]["amount"], -1500);

    let (_, pending) = call(&app, get("/driver/requests")).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_oversized_quoted_price_rejected() {
    let (app, _) = test_app();
    let (status, body) = call(
        &app,
        send_json(
            "POST",
            "/driver/requests",
            json!({
                "origin": "Viana",
                "destination": "Talatona",
                "estimated_time_min": 15,
                "passengers": 1,
                "payment_method": "cash",
                "quoted_price": i64::MAX
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "quoted_price");

    let (status, _) = call(&app, get("/earnings")).await;
    assert_eq!(status, StatusCode::OK);
}

// ── Passenger trips ──

#[tokio::test]
async fn test_trip_history_tabs() {
    let (app, _) = test_app();

    let (status, body) = call(&app, get("/trips")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tab"], "recent");
    let recent = body["trips"].as_array().unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[2]["status"], "cancelled");

    let (_, body) = call(&app, get("/trips?tab=upcoming")).await;
    assert_eq!(body["trips"][0]["status"], "in_progress");
    assert_eq!(body["trips"][0]["destination"], "Aeroporto");

    let (_, request) = call(
        &app,
        send_json(
            "POST",
            "/driver/requests",
            json!({
                "origin": "Viana",
                "destination": "Talatona",
                "estimated_time_min": 15,
                "passengers": 1,
                "payment_method": "cash",
                "quoted_price": 1200
            }),
        ),
    )
    .await;
    let id = request["id"].as_str().unwrap();
    call(&app, post_empty(&format!("/driver/requests/{id}/accept"))).await;
    let (_, body) = call(&app, get("/trips?tab=upcoming")).await;
    assert_eq!(body["trips"].as_array().unwrap().len(), 2);

    call(&app, post_empty("/driver/trip/complete")).await;
    let (_, body) = call(&app, get("/trips?tab=recent")).await;
    let recent = body["trips"].as_array().unwrap();
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0]["id"], id);
    assert_eq!(recent[0]["status"], "completed");
}

// ── Navigation ──

#[tokio::test]
async fn test_route_lookup() {
    let (app, _) = test_app();

    let (_, routes) = call(&app, get("/navigation/routes")).await;
    assert_eq!(routes.as_array().unwrap().len(), 15);

    let (status, body) = call(&app, get("/navigation/resolve?path=/(driver)/check-in")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["route"], "driver_check_in");
    assert_eq!(body["is_tab"], true);

    let (status, body) = call(&app, get("/navigation/resolve?path=/(driver)/garage")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

// ── Fares ──

#[tokio::test]
async fn test_tds_quote_display() {
    let (app, _) = test_app();
    let (status, body) = call(
        &app,
        send_json("POST", "/fares/quote", json!({ "base_price": 1000, "payment_method": "wiza_tds" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_price"], 900);
    assert_eq!(body["display_total"], "Kz 900");
}

#[tokio::test]
async fn test_invalid_surge_rejected() {
    let (app, _) = test_app();
    let (status, body) = call(
        &app,
        send_json("POST", "/fares/quote", json!({ "base_price": 1000, "surge_multiplier": 0.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "surge_multiplier");

    let (_, methods) = call(&app, get("/fares/methods")).await;
    assert_eq!(methods.as_array().unwrap().len(), 3);
}

// ── Check-in ──

#[tokio::test]
async fn test_manual_checkin() {
    let (app, _) = test_app();

    let (status, body) = call(&app, send_json("POST", "/checkin/manual", json!({ "code": "12345" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    let (status, body) = call(&app, send_json("POST", "/checkin/manual", json!({ "code": "123456" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "confirmed");

    // Feedback modal is up, so the scanner is paused
    let (status, _) = call(&app, send_json("POST", "/checkin/manual", json!({ "code": "654321" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = call(&app, post_empty("/checkin/feedback/dismiss")).await;
    assert_eq!(body["phase"], "scanning");
    assert_eq!(body["feedback_modal"], "closed");

    let (status, body) = call(&app, send_json("POST", "/checkin/manual", json!({ "code": "000000" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "rejected");

    let (_, history) = call(&app, get("/checkin/history")).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["name"], "João Silva");
    assert_eq!(history[0]["status"], "confirmed");
    // The rejected code pushed nothing; the seeded failure is still last
    assert_eq!(history[2]["status"], "confirmed");
}

#[tokio::test]
async fn test_checkin_screen_opens_with_seeded_history() {
    let (app, _) = test_app();
    let (_, state) = call(&app, get("/checkin")).await;
    assert_eq!(state["phase"], "scanning");
    assert_eq!(state["history"][2]["name"], "Ana Costa");
    assert_eq!(state["history"][2]["status"], "error");
}

#[tokio::test]
async fn test_feedback_modal_driven_by_client_animation() {
    let (app, _) = test_app();
    call(&app, send_json("POST", "/checkin/manual", json!({ "code": "123456" }))).await;

    let (status, body) = call(&app, post_empty("/checkin/feedback/animation-finished")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "feedback");
    assert_eq!(body["feedback_modal"], "open");

    let (_, body) = call(&app, post_empty("/checkin/feedback/dismiss")).await;
    assert_eq!(body["phase"], "scanning");
}

#[tokio::test]
async fn test_scan_checkin() {
    let (app, _) = test_app_with(ScanResult::Unreadable);
    let (status, body) = call(&app, post_empty("/checkin/scan")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "rejected");
    assert_eq!(body["title"], "QR Code Inválido");

    let (_, state) = call(&app, get("/checkin")).await;
    assert_eq!(state["phase"], "feedback");
}

// ── Wallet and earnings ──

#[tokio::test]
async fn test_negative_top_up_rejected() {
    let (app, notifications) = test_app();

    let (status, _) = call(&app, send_json("POST", "/wallet/top-up", json!({ "amount": "-5" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, wallet) = call(&app, get("/wallet")).await;
    assert_eq!(wallet["balance"], 2450);
    assert_eq!(wallet["display_balance"], "Kz 2.450");
    assert!(notifications.sent.lock().unwrap().is_empty());

    let (status, body) = call(&app, send_json("POST", "/wallet/top-up", json!({ "amount": "1e300" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "amount");
    let (_, wallet) = call(&app, get("/wallet")).await;
    assert_eq!(wallet["balance"], 2450);
}

#[tokio::test]
async fn test_top_up() {
    let (app, notifications) = test_app();

    let (status, body) = call(&app, send_json("POST", "/wallet/top-up", json!({ "amount": "500" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["kind"], "top_up");

    let (_, wallet) = call(&app, get("/wallet")).await;
    assert_eq!(wallet["balance"], 2950);
    assert_eq!(notifications.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_earnings_and_withdrawal() {
    let (app, _) = test_app();

    let (status, body) = call(&app, get("/earnings?period=week")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"], "week");
    assert_eq!(body["chart"].as_array().unwrap().len(), 7);
    let available = body["available_balance"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        send_json(
            "POST",
            "/earnings/withdrawals",
            json!({ "method": "digital_wallet", "amount": available + 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "insufficient_balance");

    let (status, body) = call(
        &app,
        send_json("POST", "/earnings/withdrawals", json!({ "method": "digital_wallet" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["amount"], available);
    assert_eq!(body["remaining_balance"], 0);
}

// ── Safety ──

#[tokio::test]
async fn test_sos_alerts_all_contacts() {
    let (app, notifications) = test_app();

    let (status, contact) = call(
        &app,
        send_json(
            "POST",
            "/safety/contacts",
            json!({ "name": "Teresa Lopes", "phone": "+244 934 111 222", "relationship": "Amiga" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, alert) = call(
        &app,
        send_json("POST", "/safety/sos", json!({ "location": { "latitude": -8.8383, "longitude": 13.2344 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alert["contacts_notified"], 3);

    let sent = notifications.sent.lock().unwrap();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|(_, m)| m.priority == NotificationPriority::High));
    drop(sent);

    let id = contact["id"].as_str().unwrap();
    let (status, _) = call(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/safety/contacts/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, contacts) = call(&app, get("/safety/contacts")).await;
    assert_eq!(contacts.as_array().unwrap().len(), 2);
}

// ── Forms ──

#[tokio::test]
async fn test_login_form_validation() {
    let (app, _) = test_app();

    let (status, body) = call(
        &app,
        send_json("POST", "/forms/login", json!({ "email": "joao", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"].as_array().unwrap().len(), 2);

    let (status, _) = call(
        &app,
        send_json("POST", "/forms/login", json!({ "email": "joao@wiza.ao", "password": "segredo" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
