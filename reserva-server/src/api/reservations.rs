//! Customer booking API

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::live::OccupancyEvent;
use shared::models::{ReservationCreate, ReservationWithCustomer, ReservationWithRestaurant};
use shared::util::now_millis;

use crate::auth::Session;
use crate::db;
use crate::email::{send_booking_confirmation, send_cancellation_notice};
use crate::error::ServiceResult;
use crate::state::AppState;

/// Book a table
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<ReservationCreate>,
) -> ServiceResult<(StatusCode, Json<ReservationWithRestaurant>)> {
    let customer = session.require_customer()?;

    if req.guests < 1 {
        return Err(AppError::validation("Party size must be at least 1").into());
    }
    if req.reservation_at < now_millis() {
        return Err(AppError::new(ErrorCode::ReservationInPast).into());
    }
    if !state.clock.within_opening_hours(req.reservation_at) {
        return Err(AppError::new(ErrorCode::OutsideOpeningHours).into());
    }

    let (reservation, restaurant) = db::reservations::book(
        &state.pool,
        req.restaurant_id,
        customer.user_id,
        req.guests,
        req.reservation_at,
    )
    .await?;

    tracing::info!(
        reservation_id = reservation.id,
        restaurant_id = restaurant.id,
        guests = reservation.guests,
        "Reservation booked"
    );

    send_booking_confirmation(
        state.mailer.as_ref(),
        &state.clock,
        &customer.name,
        &customer.email,
        &restaurant.name,
        &reservation,
    )
    .await;

    state.hub.publish(
        restaurant.id,
        OccupancyEvent::NewReservation {
            reservation: ReservationWithCustomer {
                reservation: reservation.clone(),
                customer_name: customer.name.clone(),
                customer_email: customer.email.clone(),
            },
        },
    );
    state.hub.publish(
        restaurant.id,
        OccupancyEvent::OccupancyUpdate {
            restaurant_id: restaurant.id,
        },
    );

    Ok((
        StatusCode::CREATED,
        Json(ReservationWithRestaurant {
            reservation,
            restaurant_name: restaurant.name,
        }),
    ))
}

/// The customer's own reservations, earliest slot first
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ServiceResult<Json<Vec<ReservationWithRestaurant>>> {
    let customer = session.require_customer()?;
    let reservations = db::reservations::list_for_user(&state.pool, customer.user_id).await?;
    Ok(Json(reservations))
}

/// Cancel one of the customer's reservations
pub async fn cancel(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<ApiResponse<()>>> {
    let customer = session.require_customer()?;

    let reservation = db::reservations::cancel(&state.pool, id, customer.user_id).await?;

    tracing::info!(reservation_id = id, "Reservation cancelled");

    if let Some(restaurant) =
        db::restaurants::find_by_id(&state.pool, reservation.restaurant_id).await?
    {
        send_cancellation_notice(
            state.mailer.as_ref(),
            &state.clock,
            &customer.name,
            &customer.email,
            &restaurant.name,
            &reservation,
        )
        .await;
    }

    state.hub.publish(
        reservation.restaurant_id,
        OccupancyEvent::OccupancyUpdate {
            restaurant_id: reservation.restaurant_id,
        },
    );

    Ok(Json(ApiResponse::ok()))
}
