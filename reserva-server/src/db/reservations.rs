//! Reservation queries and the row-locked booking transaction
//!
//! Capacity is enforced by serializing bookings per restaurant: the
//! booking transaction takes `FOR UPDATE` on the restaurant row, so two
//! concurrent requests for the same restaurant re-check availability
//! one after the other.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    Reservation, ReservationStatus, ReservationWithCustomer, ReservationWithRestaurant, Restaurant,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use crate::availability::ReservationSpan;
use crate::capacity::{assigned_guests, tables_needed, tables_total};
use crate::error::{ServiceError, ServiceResult};
use crate::lifecycle;
use crate::timeslot::RESERVATION_MS;

/// Raw reservation row; status arrives as TEXT and is parsed on the way out
#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: i64,
    restaurant_id: i64,
    user_id: i64,
    requested_guests: i32,
    guests: i32,
    reservation_at: i64,
    status: String,
    presence_confirmed: bool,
    presence_confirmed_at: Option<i64>,
    created_at: i64,
}

impl ReservationRow {
    fn into_model(self) -> ServiceResult<Reservation> {
        let status: ReservationStatus = self
            .status
            .parse()
            .map_err(|e: shared::models::InvalidStatus| ServiceError::Db(e.into()))?;
        Ok(Reservation {
            id: self.id,
            restaurant_id: self.restaurant_id,
            user_id: self.user_id,
            requested_guests: self.requested_guests,
            guests: self.guests,
            reservation_at: self.reservation_at,
            status,
            presence_confirmed: self.presence_confirmed,
            presence_confirmed_at: self.presence_confirmed_at,
            created_at: self.created_at,
        })
    }
}

const RESERVATION_COLUMNS: &str =
    "id, restaurant_id, user_id, requested_guests, guests, reservation_at, status, \
     presence_confirmed, presence_confirmed_at, created_at";

/// Book a reservation, enforcing table capacity under the restaurant row lock.
///
/// The caller has already validated the time (future instant on the
/// opening-hours grid). `guests` is the requested party size; the stored
/// count is rounded up to whole tables.
pub async fn book(
    pool: &PgPool,
    restaurant_id: i64,
    user_id: i64,
    guests: i32,
    reservation_at: i64,
) -> ServiceResult<(Reservation, Restaurant)> {
    let mut tx = pool.begin().await?;

    let restaurant: Restaurant =
        sqlx::query_as("SELECT * FROM restaurants WHERE id = $1 FOR UPDATE")
            .bind(restaurant_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    // Active reservations whose 90-minute hold intersects ours
    let overlapping: Vec<(i64, i32)> = sqlx::query_as(
        "SELECT reservation_at, guests FROM reservations
         WHERE restaurant_id = $1
           AND status IN ('pending', 'confirmed')
           AND reservation_at < $2
           AND reservation_at + $3 > $4",
    )
    .bind(restaurant_id)
    .bind(reservation_at + RESERVATION_MS)
    .bind(RESERVATION_MS)
    .bind(reservation_at)
    .fetch_all(&mut *tx)
    .await?;

    let used: i32 = overlapping.iter().map(|&(_, g)| tables_needed(g)).sum();
    if used + tables_needed(guests) > tables_total(restaurant.seats_total) {
        return Err(AppError::new(ErrorCode::CapacityExceeded).into());
    }

    let id = snowflake_id();
    let now = now_millis();
    let booked_guests = assigned_guests(guests);

    sqlx::query(
        "INSERT INTO reservations
             (id, restaurant_id, user_id, requested_guests, guests, reservation_at,
              status, presence_confirmed, presence_confirmed_at, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, 'pending', FALSE, NULL, $7)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(user_id)
    .bind(guests)
    .bind(booked_guests)
    .bind(reservation_at)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((
        Reservation {
            id,
            restaurant_id,
            user_id,
            requested_guests: guests,
            guests: booked_guests,
            reservation_at,
            status: ReservationStatus::Pending,
            presence_confirmed: false,
            presence_confirmed_at: None,
            created_at: now,
        },
        restaurant,
    ))
}

/// Cancel a pending reservation the customer owns. The row is deleted,
/// not kept with a cancelled status.
///
/// Returns the deleted reservation so the caller can publish occupancy.
pub async fn cancel(pool: &PgPool, id: i64, user_id: i64) -> ServiceResult<Reservation> {
    let mut tx = pool.begin().await?;

    let row: Option<ReservationRow> = sqlx::query_as(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    // Another customer's reservation is indistinguishable from a missing one
    let reservation = match row {
        Some(row) if row.user_id == user_id => row.into_model()?,
        _ => return Err(AppError::new(ErrorCode::ReservationNotFound).into()),
    };

    if reservation.status.is_terminal() {
        return Err(AppError::new(ErrorCode::ReservationTerminal).into());
    }

    sqlx::query("DELETE FROM reservations WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(reservation)
}

/// Record the presence decision for a pending reservation.
///
/// Marking a guest present is allowed from the slot start onward;
/// marking them absent only once the grace period after the slot start
/// has passed.
pub async fn confirm_presence(
    pool: &PgPool,
    id: i64,
    restaurant_id: i64,
    present: bool,
    now: i64,
    grace_ms: i64,
) -> ServiceResult<Reservation> {
    let mut tx = pool.begin().await?;

    let row: Option<ReservationRow> = sqlx::query_as(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations
         WHERE id = $1 AND restaurant_id = $2 FOR UPDATE"
    ))
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(&mut *tx)
    .await?;

    let mut reservation = row
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?
        .into_model()?;

    reservation.status = lifecycle::presence_transition(
        reservation.status,
        reservation.reservation_at,
        present,
        now,
        grace_ms,
    )?;
    reservation.presence_confirmed = present;
    reservation.presence_confirmed_at = Some(now);

    sqlx::query(
        "UPDATE reservations
         SET status = $1, presence_confirmed = $2, presence_confirmed_at = $3
         WHERE id = $4",
    )
    .bind(reservation.status.as_str())
    .bind(reservation.presence_confirmed)
    .bind(reservation.presence_confirmed_at)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(reservation)
}

/// Flip overdue pending reservations to no-show in one statement.
///
/// Returns the affected reservations with customer contact so the
/// sweep can publish events and notify the customers.
pub async fn sweep_no_shows(
    pool: &PgPool,
    now: i64,
    grace_ms: i64,
) -> ServiceResult<Vec<ReservationWithCustomer>> {
    let rows: Vec<StaffViewRow> = sqlx::query_as(
        "UPDATE reservations AS r SET status = 'no_show'
         FROM users u
         WHERE u.id = r.user_id
           AND r.status = 'pending'
           AND r.reservation_at + $1 < $2
         RETURNING r.id, r.restaurant_id, r.user_id, r.requested_guests, r.guests,
                   r.reservation_at, r.status, r.presence_confirmed,
                   r.presence_confirmed_at, r.created_at,
                   u.name AS customer_name, u.email AS customer_email",
    )
    .bind(grace_ms)
    .bind(now)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(StaffViewRow::into_model).collect()
}

/// Active reservation spans intersecting `[from, to)`, for availability math
pub async fn active_spans(
    pool: &PgPool,
    restaurant_id: i64,
    from: i64,
    to: i64,
) -> ServiceResult<Vec<ReservationSpan>> {
    let rows: Vec<(i64, i32)> = sqlx::query_as(
        "SELECT reservation_at, guests FROM reservations
         WHERE restaurant_id = $1
           AND status IN ('pending', 'confirmed')
           AND reservation_at < $2
           AND reservation_at + $3 > $4",
    )
    .bind(restaurant_id)
    .bind(to)
    .bind(RESERVATION_MS)
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(start, guests)| ReservationSpan { start, guests })
        .collect())
}

#[derive(sqlx::FromRow)]
struct CustomerViewRow {
    id: i64,
    restaurant_id: i64,
    user_id: i64,
    requested_guests: i32,
    guests: i32,
    reservation_at: i64,
    status: String,
    presence_confirmed: bool,
    presence_confirmed_at: Option<i64>,
    created_at: i64,
    restaurant_name: String,
}

/// A customer's reservations, earliest slot first
pub async fn list_for_user(
    pool: &PgPool,
    user_id: i64,
) -> ServiceResult<Vec<ReservationWithRestaurant>> {
    let rows: Vec<CustomerViewRow> = sqlx::query_as(
        "SELECT r.id, r.restaurant_id, r.user_id, r.requested_guests, r.guests,
                r.reservation_at, r.status, r.presence_confirmed,
                r.presence_confirmed_at, r.created_at,
                rest.name AS restaurant_name
         FROM reservations r
         JOIN restaurants rest ON rest.id = r.restaurant_id
         WHERE r.user_id = $1
         ORDER BY r.reservation_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let restaurant_name = row.restaurant_name;
            let reservation = ReservationRow {
                id: row.id,
                restaurant_id: row.restaurant_id,
                user_id: row.user_id,
                requested_guests: row.requested_guests,
                guests: row.guests,
                reservation_at: row.reservation_at,
                status: row.status,
                presence_confirmed: row.presence_confirmed,
                presence_confirmed_at: row.presence_confirmed_at,
                created_at: row.created_at,
            }
            .into_model()?;
            Ok(ReservationWithRestaurant {
                reservation,
                restaurant_name,
            })
        })
        .collect()
}

#[derive(sqlx::FromRow)]
struct StaffViewRow {
    id: i64,
    restaurant_id: i64,
    user_id: i64,
    requested_guests: i32,
    guests: i32,
    reservation_at: i64,
    status: String,
    presence_confirmed: bool,
    presence_confirmed_at: Option<i64>,
    created_at: i64,
    customer_name: String,
    customer_email: String,
}

impl StaffViewRow {
    fn into_model(self) -> ServiceResult<ReservationWithCustomer> {
        let customer_name = self.customer_name;
        let customer_email = self.customer_email;
        let reservation = ReservationRow {
            id: self.id,
            restaurant_id: self.restaurant_id,
            user_id: self.user_id,
            requested_guests: self.requested_guests,
            guests: self.guests,
            reservation_at: self.reservation_at,
            status: self.status,
            presence_confirmed: self.presence_confirmed,
            presence_confirmed_at: self.presence_confirmed_at,
            created_at: self.created_at,
        }
        .into_model()?;
        Ok(ReservationWithCustomer {
            reservation,
            customer_name,
            customer_email,
        })
    }
}

/// A restaurant's reservations with customer contact, earliest slot first
pub async fn list_for_restaurant(
    pool: &PgPool,
    restaurant_id: i64,
) -> ServiceResult<Vec<ReservationWithCustomer>> {
    let rows: Vec<StaffViewRow> = sqlx::query_as(
        "SELECT r.id, r.restaurant_id, r.user_id, r.requested_guests, r.guests,
                r.reservation_at, r.status, r.presence_confirmed,
                r.presence_confirmed_at, r.created_at,
                u.name AS customer_name, u.email AS customer_email
         FROM reservations r
         JOIN users u ON u.id = r.user_id
         WHERE r.restaurant_id = $1
         ORDER BY r.reservation_at",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(StaffViewRow::into_model).collect()
}
