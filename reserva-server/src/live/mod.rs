//! OccupancyHub: per-restaurant live event fan-out
//!
//! Booking, cancellation, presence updates and the no-show sweep all
//! publish here; dashboard WebSocket sessions subscribe to one
//! restaurant room at a time.
//!
//! ```text
//! HTTP handlers / sweep task
//!       │ OccupancyEvent
//!       ▼
//! OccupancyHub
//!   └── rooms: restaurant_id → broadcast::Sender (fan-out to dashboards)
//!           │
//!           ▼
//!   Dashboard WS handler (join room → push)
//! ```

use dashmap::DashMap;
use shared::live::OccupancyEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast channel capacity, enough to buffer a burst of bookings
const BROADCAST_CAPACITY: usize = 64;

/// Global occupancy hub; rooms are strictly per restaurant
#[derive(Clone, Default)]
pub struct OccupancyHub {
    /// restaurant_id → broadcast sender for that room
    rooms: Arc<DashMap<i64, broadcast::Sender<OccupancyEvent>>>,
}

impl OccupancyHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a restaurant room (created on first use)
    pub fn subscribe(&self, restaurant_id: i64) -> broadcast::Receiver<OccupancyEvent> {
        self.rooms
            .entry(restaurant_id)
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// Publish an event to a restaurant room
    ///
    /// A room with no subscribers is a no-op (send returns Err, safely ignored).
    pub fn publish(&self, restaurant_id: i64, event: OccupancyEvent) {
        if let Some(tx) = self.rooms.get(&restaurant_id) {
            let _ = tx.send(event);
        }
    }

    /// Drop the room entry once the last subscriber disconnects
    pub fn prune(&self, restaurant_id: i64) {
        if let Some(tx) = self.rooms.get(&restaurant_id) {
            if tx.receiver_count() > 0 {
                return;
            }
            drop(tx);
        }
        self.rooms.remove(&restaurant_id);
    }

    /// Current subscriber count for a room
    pub fn subscriber_count(&self, restaurant_id: i64) -> usize {
        self.rooms
            .get(&restaurant_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ReservationStatus;

    fn updated(id: i64) -> OccupancyEvent {
        OccupancyEvent::ReservationUpdated {
            id,
            presence_confirmed: false,
            status: ReservationStatus::NoShow,
        }
    }

    #[tokio::test]
    async fn subscribe_receives_published_events() {
        let hub = OccupancyHub::new();
        let mut rx = hub.subscribe(1);

        hub.publish(1, OccupancyEvent::OccupancyUpdate { restaurant_id: 1 });
        match rx.recv().await.unwrap() {
            OccupancyEvent::OccupancyUpdate { restaurant_id } => assert_eq!(restaurant_id, 1),
            other => panic!("Expected OccupancyUpdate, got {other:?}"),
        }

        hub.publish(1, updated(9));
        match rx.recv().await.unwrap() {
            OccupancyEvent::ReservationUpdated { id, status, .. } => {
                assert_eq!(id, 9);
                assert_eq!(status, ReservationStatus::NoShow);
            }
            other => panic!("Expected ReservationUpdated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let hub = OccupancyHub::new();
        let mut rx_a = hub.subscribe(1);
        let mut rx_b = hub.subscribe(2);

        hub.publish(1, updated(100));

        match rx_a.recv().await.unwrap() {
            OccupancyEvent::ReservationUpdated { id, .. } => assert_eq!(id, 100),
            other => panic!("Expected ReservationUpdated, got {other:?}"),
        }
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn fan_out_to_multiple_subscribers() {
        let hub = OccupancyHub::new();
        let mut rx1 = hub.subscribe(7);
        let mut rx2 = hub.subscribe(7);

        hub.publish(7, OccupancyEvent::OccupancyUpdate { restaurant_id: 7 });

        assert!(matches!(
            rx1.recv().await.unwrap(),
            OccupancyEvent::OccupancyUpdate { restaurant_id: 7 }
        ));
        assert!(matches!(
            rx2.recv().await.unwrap(),
            OccupancyEvent::OccupancyUpdate { restaurant_id: 7 }
        ));
    }

    #[test]
    fn publish_without_subscribers_is_safe() {
        let hub = OccupancyHub::new();
        hub.publish(99, OccupancyEvent::OccupancyUpdate { restaurant_id: 99 });
        assert_eq!(hub.subscriber_count(99), 0);
    }

    #[tokio::test]
    async fn prune_removes_empty_rooms_only() {
        let hub = OccupancyHub::new();
        let rx = hub.subscribe(5);
        assert_eq!(hub.subscriber_count(5), 1);

        // Still subscribed: prune keeps the room
        hub.prune(5);
        assert_eq!(hub.subscriber_count(5), 1);

        drop(rx);
        hub.prune(5);
        assert_eq!(hub.subscriber_count(5), 0);
        assert!(hub.rooms.get(&5).is_none());
    }
}
