use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use cinema_booking::{Admission, BookingRequest};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::outcomes::{OutcomeStatus, OutcomeView};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub request_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct BookedResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub request_id: Uuid,
    pub movie: String,
    pub booking: Admission,
}

#[derive(Debug, Deserialize)]
pub struct DeleteBookingRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub records_removed: usize,
    pub seats_released: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/book", post(queue_booking))
        .route("/delete", post(delete_booking))
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/requests/{request_id}", get(get_booking_outcome))
}

// ============================================================================
// Handlers
// ============================================================================

/// Queue a booking and acknowledge immediately. The outcome is available
/// later under `/v1/bookings/requests/{request_id}`.
async fn queue_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    let ticket = state.queue.submit(req).await?;
    info!(request_id = %ticket.request_id, "Booking request queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(QueuedResponse {
            status: "queued",
            message: "Booking request has been queued.",
            request_id: ticket.request_id,
        }),
    ))
}

/// Queue a booking and wait for the worker's verdict.
async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookedResponse>), AppError> {
    let ticket = state.queue.submit(req).await?;
    let request_id = ticket.request_id;

    let admission = ticket.outcome().await??;

    Ok((
        StatusCode::CREATED,
        Json(BookedResponse {
            status: "success",
            message: "Seat successfully booked!",
            request_id,
            movie: admission.record.movie.clone(),
            booking: admission,
        }),
    ))
}

async fn get_booking_outcome(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<(StatusCode, Json<OutcomeView>), AppError> {
    let status = state
        .outcomes()
        .get(&request_id)
        .await
        .ok_or_else(|| AppError::NotFoundError(format!("Unknown booking request: {}", request_id)))?;

    let code = match status {
        OutcomeStatus::Pending => StatusCode::ACCEPTED,
        OutcomeStatus::Admitted(_) | OutcomeStatus::Rejected(_) => StatusCode::OK,
    };

    Ok((code, Json(OutcomeView::new(request_id, status))))
}

/// Delete every booking under a name. Runs inline, under the same lock the
/// worker takes, so it never interleaves with an admission.
async fn delete_booking(
    State(state): State<AppState>,
    Json(req): Json<DeleteBookingRequest>,
) -> Result<Json<DeletedResponse>, AppError> {
    let name = req.name.unwrap_or_default();

    let deletion = state.desk.write().await.delete_by_name(&name)?;
    info!(
        records = deletion.records_removed,
        seats = deletion.seats_released,
        "Deleted bookings for {}",
        deletion.name
    );
    let _ = state.events.send(deletion.event());

    Ok(Json(DeletedResponse {
        status: "success",
        message: "Booking deleted successfully.",
        records_removed: deletion.records_removed,
        seats_released: deletion.seats_released,
    }))
}
