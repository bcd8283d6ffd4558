//! Restaurant model

use serde::{Deserialize, Serialize};

/// Restaurant entity
///
/// Capacity is expressed in seats; the floor is laid out as two-seat
/// tables, so `seats_total` is always even.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub seats_total: i32,
    /// Staff login credential. NULL for restaurants without a dashboard account.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub created_at: i64,
}

/// Staff dashboard login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantLogin {
    pub restaurant_id: i64,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let restaurant = Restaurant {
            id: 7,
            name: "La Pasiva".to_string(),
            description: None,
            address: "Av. 18 de Julio 1255, Montevideo".to_string(),
            latitude: -34.9055,
            longitude: -56.1916,
            phone: None,
            email: None,
            seats_total: 10,
            password_hash: Some("$argon2id$secret".to_string()),
            created_at: 0,
        };
        let json = serde_json::to_string(&restaurant).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("La Pasiva"));
    }
}
