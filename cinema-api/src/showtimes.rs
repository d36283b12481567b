use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use cinema_booking::{AdmissionEvent, DeskSnapshot};
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tokio_stream::wrappers::BroadcastStream;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub queue_depth: usize,
    pub showtimes: usize,
    pub bookings: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/v1/showtimes", get(list_showtimes))
        .route("/v1/showtimes/stream", get(stream_events))
}

/// Catalog and ledger as one consistent snapshot.
async fn list_showtimes(State(state): State<AppState>) -> Json<DeskSnapshot> {
    Json(state.desk.read().await.snapshot())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let desk = state.desk.read().await;
    Json(HealthResponse {
        status: "ok",
        queue_depth: state.queue.depth(),
        showtimes: desk.catalog().len(),
        bookings: desk.ledger().len(),
    })
}

/// Seat changes as server-sent events. Lagging subscribers skip what they missed.
async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        let event = result.ok()?;
        let name = match &event {
            AdmissionEvent::SeatHeld { .. } => "seat_held",
            AdmissionEvent::SeatsReleased { .. } => "seats_released",
        };
        Event::default().event(name).json_data(&event).ok().map(Ok)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
