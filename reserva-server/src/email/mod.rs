//! Outbound email
//!
//! Booking confirmations are best-effort: a failed send is logged and
//! never fails the request that triggered it.

use async_trait::async_trait;
use shared::models::Reservation;

use crate::timeslot::LocalClock;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Email delivery seam
///
/// Production deployments plug in an SMTP or SES implementation; the
/// default [`ConsoleMailer`] just logs the message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError>;
}

/// Development mailer that writes messages to the log
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError> {
        tracing::info!(to, subject, body, "Email (console delivery)");
        Ok(())
    }
}

/// Send the booking confirmation email, best-effort
pub async fn send_booking_confirmation(
    mailer: &dyn Mailer,
    clock: &LocalClock,
    customer_name: &str,
    customer_email: &str,
    restaurant_name: &str,
    reservation: &Reservation,
) {
    let subject = format!("Confirmación de reserva - {restaurant_name}");
    let body = format!(
        "Hola {customer_name},\n\n\
         Tu reserva en {restaurant_name} para {} personas el {} fue registrada.\n\n\
         Te esperamos.",
        reservation.requested_guests,
        format_local(clock, reservation.reservation_at),
    );

    if let Err(e) = mailer.send(customer_email, &subject, &body).await {
        tracing::warn!(
            reservation_id = reservation.id,
            to = customer_email,
            "Failed to send booking confirmation: {e}"
        );
    }
}

/// Notify the customer their cancellation went through, best-effort
pub async fn send_cancellation_notice(
    mailer: &dyn Mailer,
    clock: &LocalClock,
    customer_name: &str,
    customer_email: &str,
    restaurant_name: &str,
    reservation: &Reservation,
) {
    let subject = format!("Reserva cancelada - {restaurant_name}");
    let body = format!(
        "Hola {customer_name},\n\n\
         Tu reserva en {restaurant_name} del {} fue cancelada.\n\n\
         Esperamos verte pronto.",
        format_local(clock, reservation.reservation_at),
    );

    if let Err(e) = mailer.send(customer_email, &subject, &body).await {
        tracing::warn!(
            reservation_id = reservation.id,
            to = customer_email,
            "Failed to send cancellation notice: {e}"
        );
    }
}

/// Notify the customer their reservation lapsed as a no-show, best-effort
pub async fn send_no_show_notice(
    mailer: &dyn Mailer,
    clock: &LocalClock,
    customer_name: &str,
    customer_email: &str,
    reservation: &Reservation,
) {
    let subject = "Reserva vencida".to_string();
    let body = format!(
        "Hola {customer_name},\n\n\
         Tu reserva del {} venció porque no se registró tu llegada.\n\n\
         Podés hacer una nueva reserva cuando quieras.",
        format_local(clock, reservation.reservation_at),
    );

    if let Err(e) = mailer.send(customer_email, &subject, &body).await {
        tracing::warn!(
            reservation_id = reservation.id,
            to = customer_email,
            "Failed to send no-show notice: {e}"
        );
    }
}

fn format_local(clock: &LocalClock, instant_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(instant_ms + clock.offset_ms())
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| instant_ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_local_applies_offset() {
        let clock = LocalClock::new(-180);
        // 2025-06-10 22:15 UTC == 19:15 in Montevideo
        let instant = chrono::DateTime::parse_from_rfc3339("2025-06-10T22:15:00Z")
            .unwrap()
            .timestamp_millis();
        assert_eq!(format_local(&clock, instant), "10/06/2025 19:15");
    }
}
