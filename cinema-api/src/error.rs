use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cinema_booking::BookingError;
use serde_json::json;

use crate::queue::QueueError;

#[derive(Debug)]
pub enum AppError {
    NotFoundError(String),
    ServiceUnavailable(String),
    Booking(BookingError),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, kind) = match self {
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg, None),
            AppError::Booking(err) => {
                let status = match err {
                    BookingError::MissingFields(_) => StatusCode::BAD_REQUEST,
                    BookingError::ShowtimeNotFound(_) | BookingError::BookingNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    BookingError::CapacityExceeded { .. } | BookingError::SeatUnavailable { .. } => {
                        StatusCode::CONFLICT
                    }
                };
                (status, err.to_string(), Some(err.kind()))
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), None)
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), None)
            }
        };

        let body = match kind {
            Some(kind) => json!({ "error": error_message, "kind": kind }),
            None => json!({ "error": error_message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        Self::Booking(err)
    }
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Full(_) => Self::ServiceUnavailable(err.to_string()),
            QueueError::Closed => Self::InternalServerError(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
