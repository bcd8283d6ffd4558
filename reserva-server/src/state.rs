//! Application state for the reservation server

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::email::{ConsoleMailer, Mailer};
use crate::live::OccupancyHub;
use crate::timeslot::LocalClock;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Per-restaurant live event fan-out
    pub hub: OccupancyHub,
    /// Outbound email (best-effort)
    pub mailer: Arc<dyn Mailer>,
    /// JWT secret for customer and staff sessions
    pub jwt_secret: String,
    /// Fixed-offset local clock for opening-hours math
    pub clock: LocalClock,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            hub: OccupancyHub::new(),
            mailer: Arc::new(ConsoleMailer),
            jwt_secret: config.jwt_secret.clone(),
            clock: LocalClock::new(config.local_utc_offset_minutes),
        })
    }
}
