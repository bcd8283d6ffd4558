//! Per-slot table availability
//!
//! Pure functions over in-memory reservation spans; the DB layer feeds
//! them the active reservations for the interval under consideration.

use chrono::NaiveDate;
use serde::Serialize;

use crate::capacity::{tables_needed, tables_total};
use crate::timeslot::{LocalClock, RESERVATION_MS, SLOT_MS};

/// The slice of a reservation that matters for occupancy math
#[derive(Debug, Clone, Copy)]
pub struct ReservationSpan {
    pub start: i64,
    pub guests: i32,
}

/// Free tables for one slot of the availability grid
#[derive(Debug, Clone, Serialize)]
pub struct SlotAvailability {
    /// Slot start, epoch milliseconds (UTC)
    pub start: i64,
    pub available_tables: i32,
}

/// Whether a reservation holds tables during the 15-minute slot
/// starting at `slot_start`
pub fn overlaps(span: &ReservationSpan, slot_start: i64) -> bool {
    span.start < slot_start + SLOT_MS && span.start + RESERVATION_MS > slot_start
}

/// Tables held by `spans` during the slot starting at `slot_start`
pub fn used_tables(spans: &[ReservationSpan], slot_start: i64) -> i32 {
    spans
        .iter()
        .filter(|span| overlaps(span, slot_start))
        .map(|span| tables_needed(span.guests))
        .sum()
}

/// Availability grid for one local calendar day
pub fn day_availability(
    clock: &LocalClock,
    date: NaiveDate,
    seats_total: i32,
    spans: &[ReservationSpan],
) -> Vec<SlotAvailability> {
    let total = tables_total(seats_total);
    clock
        .day_slots(date)
        .into_iter()
        .map(|start| SlotAvailability {
            start,
            available_tables: (total - used_tables(spans, start)).max(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> LocalClock {
        LocalClock::new(-180)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn slot(clock: &LocalClock, index: usize) -> i64 {
        clock.day_slots(date())[index]
    }

    #[test]
    fn test_overlap_window() {
        let span = ReservationSpan {
            start: 1_000_000,
            guests: 2,
        };
        // Same start
        assert!(overlaps(&span, 1_000_000));
        // Last slot inside the 90-minute hold
        assert!(overlaps(&span, 1_000_000 + RESERVATION_MS - SLOT_MS));
        // The slot where the hold ends is clear
        assert!(!overlaps(&span, 1_000_000 + RESERVATION_MS));
        // Slots ending at or before the reservation starts are clear
        assert!(!overlaps(&span, 1_000_000 - SLOT_MS));
        assert!(!overlaps(&span, 1_000_000 - RESERVATION_MS + 60_000));
        // A reservation landing inside the slot does collide
        assert!(overlaps(&span, 1_000_000 - SLOT_MS + 60_000));
    }

    #[test]
    fn test_used_tables_sums_overlapping_parties() {
        let clock = clock();
        let at = slot(&clock, 10);
        let spans = [
            ReservationSpan {
                start: at,
                guests: 4,
            },
            ReservationSpan {
                start: at + SLOT_MS,
                guests: 3,
            },
            ReservationSpan {
                start: at + RESERVATION_MS,
                guests: 8,
            },
        ];
        // 4 guests = 2 tables; the later spans have not started yet
        assert_eq!(used_tables(&spans, at), 2);
        // One slot in, the party of 3 adds its 2 tables
        assert_eq!(used_tables(&spans, at + SLOT_MS), 4);
        // Where the first hold ends, the party of 3 runs one slot longer
        // and the party of 8 begins
        assert_eq!(used_tables(&spans, at + RESERVATION_MS), 6);
    }

    #[test]
    fn test_day_availability_scenario() {
        // 10 seats = 5 tables
        let clock = clock();
        let at = slot(&clock, 20);

        // A party of 3 holds 2 tables for 90 minutes
        let spans = [ReservationSpan {
            start: at,
            guests: 3,
        }];
        let grid = day_availability(&clock, date(), 10, &spans);
        assert_eq!(grid.len(), 55);
        assert_eq!(grid[20].available_tables, 3);
        // The hold spans 6 slots (90 / 15)
        assert_eq!(grid[25].available_tables, 3);
        assert_eq!(grid[26].available_tables, 5);
        assert_eq!(grid[19].available_tables, 5);
        assert_eq!(grid[14].available_tables, 5);

        // Adding a party of 8 (4 tables) fills the restaurant
        let spans = [
            ReservationSpan {
                start: at,
                guests: 3,
            },
            ReservationSpan {
                start: at,
                guests: 8,
            },
        ];
        let grid = day_availability(&clock, date(), 10, &spans);
        assert_eq!(grid[20].available_tables, 0);
        assert_eq!(grid[26].available_tables, 5);
    }

    #[test]
    fn test_slots_before_reservation_stay_free() {
        // 10 seats = 5 tables; a booking must not hold tables in slots
        // that end before it starts
        let clock = clock();
        let at = slot(&clock, 20);
        let spans = [ReservationSpan {
            start: at,
            guests: 3,
        }];
        let grid = day_availability(&clock, date(), 10, &spans);
        assert_eq!(grid[19].available_tables, 5);
        assert_eq!(grid[15].available_tables, 5);
        assert_eq!(grid[20].available_tables, 3);
    }

    #[test]
    fn test_day_availability_never_negative() {
        let clock = clock();
        let at = slot(&clock, 0);
        let spans = [
            ReservationSpan {
                start: at,
                guests: 8,
            },
            ReservationSpan {
                start: at,
                guests: 8,
            },
        ];
        let grid = day_availability(&clock, date(), 10, &spans);
        assert_eq!(grid[0].available_tables, 0);
    }
}
