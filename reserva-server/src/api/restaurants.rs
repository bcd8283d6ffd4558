//! Restaurant directory, availability grid, and the staff dashboard

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::live::OccupancyEvent;
use shared::models::{PresenceUpdate, Reservation, ReservationWithCustomer, Restaurant};
use shared::util::now_millis;

use crate::auth::Session;
use crate::availability::{SlotAvailability, day_availability};
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::timeslot::{NO_SHOW_GRACE_MS, SLOT_MS};

/// All restaurants, alphabetical
pub async fn list(State(state): State<AppState>) -> ServiceResult<Json<Vec<Restaurant>>> {
    let restaurants = db::restaurants::list(&state.pool).await?;
    Ok(Json(restaurants))
}

pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<Restaurant>> {
    let restaurant = db::restaurants::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    Ok(Json(restaurant))
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    /// Local calendar day, YYYY-MM-DD
    pub date: String,
}

/// Free tables per 15-minute slot for one local day
pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> ServiceResult<Json<Vec<SlotAvailability>>> {
    let restaurant = db::restaurants::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::validation("Invalid date, expected YYYY-MM-DD"))?;

    let slots = state.clock.day_slots(date);
    let (from, to) = (slots[0], slots[slots.len() - 1] + SLOT_MS);
    let spans = db::reservations::active_spans(&state.pool, id, from, to).await?;

    Ok(Json(day_availability(
        &state.clock,
        date,
        restaurant.seats_total,
        &spans,
    )))
}

/// Dashboard list of the restaurant's reservations with customer contact
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ServiceResult<Json<Vec<ReservationWithCustomer>>> {
    let staff = session.require_staff()?;
    let reservations =
        db::reservations::list_for_restaurant(&state.pool, staff.restaurant_id).await?;
    Ok(Json(reservations))
}

/// Record whether the party showed up.
///
/// Present confirms the reservation; absent marks it no-show, which is
/// only allowed once the grace period after the slot start has passed.
pub async fn confirm_presence(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
    Json(req): Json<PresenceUpdate>,
) -> ServiceResult<Json<Reservation>> {
    let staff = session.require_staff()?;

    let reservation = db::reservations::confirm_presence(
        &state.pool,
        id,
        staff.restaurant_id,
        req.present,
        now_millis(),
        NO_SHOW_GRACE_MS,
    )
    .await?;

    state.hub.publish(
        staff.restaurant_id,
        OccupancyEvent::ReservationUpdated {
            id: reservation.id,
            presence_confirmed: reservation.presence_confirmed,
            status: reservation.status,
        },
    );
    // A no-show releases its tables
    if !req.present {
        state.hub.publish(
            staff.restaurant_id,
            OccupancyEvent::OccupancyUpdate {
                restaurant_id: staff.restaurant_id,
            },
        );
    }

    Ok(Json(reservation))
}
