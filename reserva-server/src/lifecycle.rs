//! Reservation lifecycle transitions
//!
//! Pure decision logic for staff presence marks; the DB layer applies
//! the outcome inside its row-locked transaction.

use shared::error::{AppError, ErrorCode};
use shared::models::ReservationStatus;

/// Decide the status a presence mark moves a reservation to.
///
/// Marking a guest present is allowed from the slot start onward;
/// marking them absent only once the grace period after the slot start
/// has elapsed. Reservations already confirmed or lapsed reject any
/// further marks.
pub fn presence_transition(
    status: ReservationStatus,
    reservation_at: i64,
    present: bool,
    now: i64,
    grace_ms: i64,
) -> Result<ReservationStatus, AppError> {
    if status.is_terminal() {
        return Err(AppError::new(ErrorCode::ReservationTerminal));
    }

    let earliest = if present {
        reservation_at
    } else {
        reservation_at + grace_ms
    };
    if now < earliest {
        return Err(AppError::new(ErrorCode::ConfirmationTooEarly));
    }

    Ok(if present {
        ReservationStatus::Confirmed
    } else {
        ReservationStatus::NoShow
    })
}
