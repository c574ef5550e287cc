//! Bookings and the outcome of an atomic booking write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Id, hotel::Room};

/// A user's reservation of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
  pub id:         Id,
  pub user_id:    Id,
  pub room_id:    Id,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A booking with the room it references embedded: the `GET /booking`
/// response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingWithRoom {
  pub id:   Id,
  #[serde(rename = "Room")]
  pub room: Room,
}

/// Result of [`BookingStore::place_booking`](crate::store::BookingStore::place_booking)
/// and [`BookingStore::move_booking`](crate::store::BookingStore::move_booking).
///
/// The store re-counts the target room inside the write transaction, so a
/// room that passed the capacity pre-check may still come back `RoomFull`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
  Placed(Booking),
  RoomFull,
  RoomMissing,
  /// Only returned by `place_booking`: the user already holds a booking.
  AlreadyBooked,
  /// Only returned by `move_booking`: the booking row no longer exists.
  BookingMissing,
}
