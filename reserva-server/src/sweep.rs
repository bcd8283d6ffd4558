//! No-show sweep
//!
//! A background task that flips overdue pending reservations to
//! no-show once the 15-minute grace period after their slot start has
//! passed, then notifies the affected restaurant rooms and customers.

use shared::live::OccupancyEvent;
use shared::util::now_millis;

use crate::db;
use crate::email::send_no_show_notice;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::timeslot::NO_SHOW_GRACE_MS;

/// Spawn the periodic sweep task
pub fn spawn(state: AppState, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            match sweep_once(&state).await {
                Ok(0) => {}
                Ok(n) => tracing::info!(swept = n, "Marked overdue reservations as no-show"),
                Err(e) => {
                    let err: shared::error::AppError = e.into();
                    tracing::warn!(error = %err, "No-show sweep failed");
                }
            }
        }
    });
}

/// Run one sweep pass; returns how many reservations were flipped
pub async fn sweep_once(state: &AppState) -> ServiceResult<usize> {
    let now = now_millis();
    let swept = db::reservations::sweep_no_shows(&state.pool, now, NO_SHOW_GRACE_MS).await?;

    for item in &swept {
        let reservation = &item.reservation;
        state.hub.publish(
            reservation.restaurant_id,
            OccupancyEvent::ReservationUpdated {
                id: reservation.id,
                presence_confirmed: reservation.presence_confirmed,
                status: reservation.status,
            },
        );
        state.hub.publish(
            reservation.restaurant_id,
            OccupancyEvent::OccupancyUpdate {
                restaurant_id: reservation.restaurant_id,
            },
        );
        send_no_show_notice(
            state.mailer.as_ref(),
            &state.clock,
            &item.customer_name,
            &item.customer_email,
            reservation,
        )
        .await;
    }

    Ok(swept.len())
}
