//! Reservation model and status lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reservation lifecycle status
///
/// Transitions are one-way: `pending` is the only state that can still
/// change. Presence confirmation moves it to `confirmed` or `no_show`,
/// cancellation deletes the row (there is no `cancelled` row kept for
/// customer cancellations, the variant exists for the wire format).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    NoShow,
    Cancelled,
}

impl ReservationStatus {
    /// Database/wire string for this status
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether this reservation still occupies tables
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether the lifecycle is settled and no further transition is allowed
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when parsing an unknown status string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid reservation status: {}", self.0)
    }
}

impl std::error::Error for InvalidStatus {}

impl FromStr for ReservationStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "no_show" => Ok(Self::NoShow),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// Reservation entity
///
/// `reservation_at` is the slot start in epoch milliseconds (UTC).
/// `guests` is the booked party size already rounded up to fill whole
/// two-seat tables; `requested_guests` is what the customer asked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub restaurant_id: i64,
    pub user_id: i64,
    pub requested_guests: i32,
    pub guests: i32,
    pub reservation_at: i64,
    pub status: ReservationStatus,
    pub presence_confirmed: bool,
    /// When staff recorded the presence decision; None until they do
    pub presence_confirmed_at: Option<i64>,
    pub created_at: i64,
}

/// Reservation joined with its restaurant, for customer-facing listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationWithRestaurant {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub restaurant_name: String,
}

/// Reservation joined with its customer, for the staff dashboard and live feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationWithCustomer {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub customer_name: String,
    pub customer_email: String,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub restaurant_id: i64,
    pub guests: i32,
    pub reservation_at: i64,
}

/// Presence confirmation payload (staff dashboard)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceUpdate {
    pub present: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str_roundtrip() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::NoShow,
            ReservationStatus::Cancelled,
        ] {
            let parsed: ReservationStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_parse_invalid() {
        let err = "seated".parse::<ReservationStatus>().unwrap_err();
        assert_eq!(err, InvalidStatus("seated".to_string()));
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&ReservationStatus::NoShow).unwrap();
        assert_eq!(json, "\"no_show\"");

        let status: ReservationStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, ReservationStatus::Pending);
    }

    #[test]
    fn test_status_lifecycle_flags() {
        assert!(ReservationStatus::Pending.is_active());
        assert!(ReservationStatus::Confirmed.is_active());
        assert!(!ReservationStatus::NoShow.is_active());
        assert!(!ReservationStatus::Cancelled.is_active());

        assert!(!ReservationStatus::Pending.is_terminal());
        assert!(ReservationStatus::Confirmed.is_terminal());
        assert!(ReservationStatus::NoShow.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_reservation_with_restaurant_flattens() {
        let item = ReservationWithRestaurant {
            reservation: Reservation {
                id: 1,
                restaurant_id: 2,
                user_id: 3,
                requested_guests: 3,
                guests: 4,
                reservation_at: 1_700_000_000_000,
                status: ReservationStatus::Pending,
                presence_confirmed: false,
                presence_confirmed_at: None,
                created_at: 0,
            },
            restaurant_name: "Café Brasilero".to_string(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["restaurant_name"], "Café Brasilero");
    }
}
