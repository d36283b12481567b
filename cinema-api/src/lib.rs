use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod error;
pub mod outcomes;
pub mod page;
pub mod queue;
pub mod showtimes;
pub mod state;
pub mod worker;

pub use state::AppState;
pub use worker::BookingWorker;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .merge(page::routes())
        .merge(bookings::routes())
        .merge(showtimes::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
