//! PostgreSQL access layer
//!
//! Each module owns the queries for one table. Row locking for the
//! booking and lifecycle transactions lives in [`reservations`].

pub mod reservations;
pub mod restaurants;
pub mod users;
