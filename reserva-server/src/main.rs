//! reserva-server: restaurant table reservations
//!
//! Customers register, check per-slot availability and book tables;
//! restaurant dashboards follow live occupancy over WebSocket and
//! record presence. A background sweep flips overdue pending
//! reservations to no-show.

mod api;
mod auth;
mod availability;
mod capacity;
mod config;
mod db;
mod email;
mod error;
mod lifecycle;
mod live;
mod state;
mod sweep;
mod timeslot;

use config::Config;
use state::AppState;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reserva_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting reserva-server ({})", config.environment);

    let state = AppState::new(&config).await?;
    tracing::info!("Database connected, migrations applied");

    sweep::spawn(state.clone(), config.sweep_interval_secs);

    let app = api::create_router(state);
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
