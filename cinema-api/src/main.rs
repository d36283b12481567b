use anyhow::Context;
use cinema_api::{app, AppState};
use cinema_booking::BookingDesk;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinema_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cinema_store::Config::load().context("Failed to load config")?;

    let desk = BookingDesk::seeded(config.business_rules.release_policy);
    tracing::info!(
        "Loaded {} showtimes, release policy {:?}",
        desk.catalog().len(),
        desk.release_policy()
    );

    let (app_state, worker) = AppState::new(desk, &config.queue);
    let worker_handle = worker.spawn();

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Router (and with it every queue sender) is gone; let the worker drain.
    worker_handle.await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
