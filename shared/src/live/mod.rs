//! Live event payloads for the occupancy feed
//!
//! Events are broadcast per restaurant over WebSocket. The wire format
//! is `{"event": "...", "data": {...}}` so dashboard clients can
//! dispatch on the event name.

use crate::models::{ReservationStatus, ReservationWithCustomer};
use serde::{Deserialize, Serialize};

/// Event pushed to dashboard subscribers of a restaurant room
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OccupancyEvent {
    /// A reservation was just booked
    NewReservation { reservation: ReservationWithCustomer },
    /// Occupancy changed; clients should re-fetch availability
    OccupancyUpdate { restaurant_id: i64 },
    /// An existing reservation changed status or presence
    ReservationUpdated {
        id: i64,
        presence_confirmed: bool,
        status: ReservationStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reservation;

    #[test]
    fn test_occupancy_update_wire_format() {
        let event = OccupancyEvent::OccupancyUpdate { restaurant_id: 42 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "occupancy_update");
        assert_eq!(json["data"]["restaurant_id"], 42);
    }

    #[test]
    fn test_reservation_updated_wire_format() {
        let event = OccupancyEvent::ReservationUpdated {
            id: 9,
            presence_confirmed: true,
            status: ReservationStatus::Confirmed,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "reservation_updated");
        assert_eq!(json["data"]["status"], "confirmed");
        assert_eq!(json["data"]["presence_confirmed"], true);
    }

    #[test]
    fn test_new_reservation_wire_format() {
        let event = OccupancyEvent::NewReservation {
            reservation: ReservationWithCustomer {
                reservation: Reservation {
                    id: 1,
                    restaurant_id: 2,
                    user_id: 3,
                    requested_guests: 2,
                    guests: 2,
                    reservation_at: 1_700_000_000_000,
                    status: ReservationStatus::Pending,
                    presence_confirmed: false,
                    presence_confirmed_at: None,
                    created_at: 0,
                },
                customer_name: "Ana".to_string(),
                customer_email: "ana@example.com".to_string(),
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "new_reservation");
        assert_eq!(json["data"]["reservation"]["guests"], 2);
        assert_eq!(json["data"]["reservation"]["customer_name"], "Ana");
    }
}
