//! Room capacity pre-check.

use crate::{
  Error, Id, Refusal, Resource, Result, hotel::Room, store::BookingStore,
};

/// Fails with `NotFound(Room)` if the room does not exist and with
/// `CannotBookRoom(RoomFull)` once its bookings reach its capacity.
///
/// This is advisory: the authoritative count happens again inside
/// [`BookingStore::place_booking`] / [`BookingStore::move_booking`].
pub async fn check_room_availability<S: BookingStore>(
  store: &S,
  room_id: Id,
) -> Result<Room> {
  let room = store
    .find_room(room_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound(Resource::Room))?;

  let booked = store
    .count_room_bookings(room_id)
    .await
    .map_err(Error::store)?;

  if booked >= room.capacity {
    return Err(Error::CannotBookRoom(Refusal::RoomFull));
  }

  Ok(room)
}
