//! Hotels and their rooms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
  pub id:         Id,
  pub name:       String,
  pub image:      String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A bookable room. `capacity` is the maximum number of simultaneous
/// bookings the room may hold and is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
  pub id:         Id,
  pub name:       String,
  pub capacity:   i64,
  pub hotel_id:   Id,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A hotel with its rooms embedded, ordered by room id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelWithRooms {
  #[serde(flatten)]
  pub hotel: Hotel,
  #[serde(rename = "Rooms")]
  pub rooms: Vec<Room>,
}
