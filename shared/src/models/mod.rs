//! Data models
//!
//! Shared between the reservation server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps epoch milliseconds (UTC).

pub mod reservation;
pub mod restaurant;
pub mod user;

// Re-exports
pub use reservation::*;
pub use restaurant::*;
pub use user::*;
