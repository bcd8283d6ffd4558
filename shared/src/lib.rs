//! Shared types for the Reserva reservation platform
//!
//! Common types used across crates including error types,
//! response structures, domain models and live event payloads.

pub mod error;
pub mod live;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

// Live event re-exports (for convenient access)
pub use live::OccupancyEvent;
