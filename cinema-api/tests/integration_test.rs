use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use cinema_api::{app, AppState};
use cinema_booking::{BookingDesk, ReleasePolicy};
use cinema_catalog::{Formation, SeatId, Showtime, ShowtimeCatalog};
use cinema_store::app_config::QueueConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

const MORNING: &str = "2024-06-26 10:00";
const EVENING: &str = "2024-06-26 19:00";

fn spawn_app(desk: BookingDesk) -> (Router, AppState) {
    let (state, worker) = AppState::new(desk, &QueueConfig::default());
    worker.spawn();
    (app(state.clone()), state)
}

fn seeded_app(policy: ReleasePolicy) -> (Router, AppState) {
    spawn_app(BookingDesk::seeded(policy))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn seat(raw: &str) -> SeatId {
    raw.parse().unwrap()
}

#[tokio::test]
async fn test_book_then_rebook_same_seat() {
    let (app, state) = seeded_app(ReleasePolicy::GlobalReset);
    let body = json!({ "showtime": MORNING, "seat": "A1", "name": "Alice" });

    let (status, value) = send(&app, "POST", "/v1/bookings", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(value["status"], "success");
    assert_eq!(value["movie"], "Galaksi Jauh: Petualangan Antar Bintang");
    assert_eq!(value["booking"]["sold_tickets"], 1);
    assert_eq!(value["booking"]["record"]["seat"], "A1");

    let (status, value) = send(&app, "POST", "/v1/bookings", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(value["kind"], "seat_unavailable");

    let desk = state.desk.read().await;
    let show = desk.catalog().get(MORNING).unwrap();
    assert_eq!(show.seat_available(&seat("A1")), Some(false));
    assert_eq!(show.sold_tickets(), 1);
    assert_eq!(desk.ledger().by_name("Alice").count(), 1);
}

#[tokio::test]
async fn test_queued_booking_outcome_lookup() {
    let (app, _state) = seeded_app(ReleasePolicy::GlobalReset);

    let (status, value) = send(
        &app,
        "POST",
        "/book",
        Some(json!({ "showtime": EVENING, "seat": "C3", "name": "Budi" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(value["status"], "queued");
    assert_eq!(value["message"], "Booking request has been queued.");
    let request_id = value["request_id"].as_str().unwrap().to_string();

    // The worker answers asynchronously; poll until it has.
    let uri = format!("/v1/bookings/requests/{request_id}");
    let mut outcome = Value::Null;
    for _ in 0..50 {
        let (status, value) = send(&app, "GET", &uri, None).await;
        if status == StatusCode::OK {
            outcome = value;
            break;
        }
        assert_eq!(status, StatusCode::ACCEPTED);
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(outcome["status"], "success");
    assert_eq!(outcome["booking"]["record"]["name"], "Budi");
}

#[tokio::test]
async fn test_unknown_request_id() {
    let (app, _state) = seeded_app(ReleasePolicy::GlobalReset);
    let uri = format!("/v1/bookings/requests/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_fields_and_unknown_showtime() {
    let (app, _state) = seeded_app(ReleasePolicy::GlobalReset);

    let (status, value) = send(&app, "POST", "/v1/bookings", Some(json!({ "name": "Alice" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["kind"], "missing_fields");

    let (status, value) = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({ "showtime": "2099-01-01 00:00", "seat": "A1", "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["kind"], "showtime_not_found");
}

#[tokio::test]
async fn test_capacity_boundary() {
    let mut catalog = ShowtimeCatalog::new();
    catalog.insert(MORNING, Showtime::with_grid("Tiny Room", Formation::Vip, "A", 4, 1));
    let (app, state) = spawn_app(BookingDesk::new(catalog, ReleasePolicy::GlobalReset));

    let (status, _) = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({ "showtime": MORNING, "seat": "A1", "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, value) = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({ "showtime": MORNING, "seat": "A2", "name": "Bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(value["kind"], "capacity_exceeded");
    assert_eq!(
        state.desk.read().await.catalog().get(MORNING).unwrap().seat_available(&seat("A2")),
        Some(true)
    );
}

#[tokio::test]
async fn test_delete_releases_every_hold() {
    let (app, state) = seeded_app(ReleasePolicy::GlobalReset);
    for (showtime, seat_id, name) in [(MORNING, "A1", "Alice"), (EVENING, "B2", "Bob")] {
        let (status, _) = send(
            &app,
            "POST",
            "/v1/bookings",
            Some(json!({ "showtime": showtime, "seat": seat_id, "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, value) = send(&app, "POST", "/delete", Some(json!({ "name": "Alice" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "success");
    assert_eq!(value["records_removed"], 1);
    assert_eq!(value["seats_released"], 2);

    let desk = state.desk.read().await;
    assert_eq!(desk.ledger().by_name("Alice").count(), 0);
    assert_eq!(desk.ledger().by_name("Bob").count(), 1);
    assert_eq!(desk.catalog().held_count(), 0);
    assert_eq!(
        desk.catalog().get(EVENING).unwrap().seat_available(&seat("B2")),
        Some(true)
    );
}

#[tokio::test]
async fn test_delete_per_booking_policy() {
    let (app, state) = seeded_app(ReleasePolicy::PerBooking);
    for (seat_id, name) in [("A1", "Alice"), ("A2", "Bob")] {
        send(
            &app,
            "POST",
            "/v1/bookings",
            Some(json!({ "showtime": MORNING, "seat": seat_id, "name": name })),
        )
        .await;
    }

    let (status, value) = send(&app, "POST", "/delete", Some(json!({ "name": "Alice" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["seats_released"], 1);

    let desk = state.desk.read().await;
    let show = desk.catalog().get(MORNING).unwrap();
    assert_eq!(show.seat_available(&seat("A1")), Some(true));
    assert_eq!(show.seat_available(&seat("A2")), Some(false));
    assert_eq!(show.sold_tickets(), 1);
}

#[tokio::test]
async fn test_delete_unknown_name() {
    let (app, state) = seeded_app(ReleasePolicy::GlobalReset);

    let (status, value) = send(&app, "POST", "/delete", Some(json!({ "name": "Alice" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["kind"], "booking_not_found");

    let (status, value) = send(&app, "POST", "/delete", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["kind"], "missing_fields");

    assert!(state.desk.read().await.ledger().is_empty());
}

#[tokio::test]
async fn test_renderable_state_and_health() {
    let (app, _state) = seeded_app(ReleasePolicy::GlobalReset);
    send(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({ "showtime": MORNING, "seat": "E10", "name": "Alice" })),
    )
    .await;

    let (status, value) = send(&app, "GET", "/v1/showtimes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["showtimes"][MORNING]["seats"]["E10"], false);
    assert_eq!(value["showtimes"][MORNING]["formation"], "teater");
    assert_eq!(value["bookings"][0]["name"], "Alice");

    let (status, value) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "ok");
    assert_eq!(value["showtimes"], 4);
    assert_eq!(value["bookings"], 1);
}

#[tokio::test]
async fn test_index_page_renders() {
    let (app, _state) = seeded_app(ReleasePolicy::GlobalReset);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Movie Ticket Booking System"));
    assert!(html.contains("Petualangan Waktu: Mesin Penjelajah Masa"));
}

#[tokio::test]
async fn test_full_queue_is_rejected() {
    let config = QueueConfig { capacity: 1, outcome_retention: 8 };
    // Worker deliberately not spawned so the queue stays full.
    let (state, _worker) = AppState::new(BookingDesk::seeded(ReleasePolicy::GlobalReset), &config);
    let router = app(state);
    let body = json!({ "showtime": MORNING, "seat": "A1", "name": "Alice" });

    let (status, _) = send(&router, "POST", "/book", Some(body.clone())).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, value) = send(&router, "POST", "/book", Some(body)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(value["error"].as_str().unwrap().contains("full"));
}

#[tokio::test]
async fn test_admission_events_are_broadcast() {
    let (app, state) = seeded_app(ReleasePolicy::GlobalReset);
    let mut events = state.events.subscribe();

    send(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({ "showtime": MORNING, "seat": "B4", "name": "Alice" })),
    )
    .await;
    send(&app, "POST", "/delete", Some(json!({ "name": "Alice" }))).await;

    match events.recv().await.unwrap() {
        cinema_booking::AdmissionEvent::SeatHeld { seat, name, .. } => {
            assert_eq!(seat, "B4");
            assert_eq!(name, "Alice");
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(matches!(
        events.recv().await.unwrap(),
        cinema_booking::AdmissionEvent::SeatsReleased { records_removed: 1, seats_released: 1, .. }
    ));
}
