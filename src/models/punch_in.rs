use crate::models::coordinates::Coordinates;
use crate::utils::time::now_millis;
use serde::Serialize;

/// A persisted location sample. Rows are never updated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PunchIn {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub user_id: String,
}

impl PunchIn {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A sample waiting for its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPunchIn {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: i64,
    pub user_id: String,
}

impl NewPunchIn {
    pub fn new(coords: Coordinates, timestamp: i64, user_id: impl Into<String>) -> Self {
        Self {
            latitude: coords.latitude,
            longitude: coords.longitude,
            timestamp,
            user_id: user_id.into(),
        }
    }

    /// Sample taken now.
    pub fn now(coords: Coordinates, user_id: impl Into<String>) -> Self {
        Self::new(coords, now_millis(), user_id)
    }
}
