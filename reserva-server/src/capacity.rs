//! Table capacity arithmetic
//!
//! Every restaurant floor is modeled as identical two-seat tables.
//! Odd party sizes still occupy a whole table, so booked guest counts
//! are rounded up to the next even number.

/// Seats per table across all restaurants
pub const SEATS_PER_TABLE: i32 = 2;

/// Total tables a restaurant can seat
pub fn tables_total(seats_total: i32) -> i32 {
    seats_total / SEATS_PER_TABLE
}

/// Tables a party of `guests` occupies
pub fn tables_needed(guests: i32) -> i32 {
    (guests + SEATS_PER_TABLE - 1) / SEATS_PER_TABLE
}

/// Guest count as stored: rounded up to fill whole tables
pub fn assigned_guests(guests: i32) -> i32 {
    tables_needed(guests) * SEATS_PER_TABLE
}
