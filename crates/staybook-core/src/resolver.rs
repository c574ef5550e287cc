//! Booking reads and writes, composed from the eligibility and capacity
//! checks.

use crate::{
  Error, Id, Refusal, Resource, Result,
  booking::{BookingWithRoom, Placement},
  capacity::check_room_availability,
  eligibility::check_booking_permission,
  store::BookingStore,
};

/// The booking held by `user_id`, with its room embedded.
pub async fn get_booking<S: BookingStore>(
  store: &S,
  user_id: Id,
) -> Result<BookingWithRoom> {
  store
    .find_booking_by_user(user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound(Resource::Booking))
}

/// Book `room_id` for `user_id` and return the new booking id.
///
/// Eligibility is checked before capacity: an ineligible user is refused
/// even when the room has space.
pub async fn create_booking<S: BookingStore>(
  store: &S,
  user_id: Id,
  room_id: Id,
) -> Result<Id> {
  check_booking_permission(store, user_id).await?;
  check_room_availability(store, room_id).await?;

  let placement = store
    .place_booking(user_id, room_id)
    .await
    .map_err(Error::store)?;

  let booking_id = settle(placement)?;
  tracing::info!(user_id, room_id, booking_id, "booking created");
  Ok(booking_id)
}

/// Move the caller's booking to `room_id` and return its (unchanged) id.
///
/// Eligibility is not re-checked: holding a booking implies it held when the
/// booking was made. `booking_id` must be the caller's own booking.
pub async fn update_booking<S: BookingStore>(
  store: &S,
  user_id: Id,
  room_id: Id,
  booking_id: Id,
) -> Result<Id> {
  let current = store
    .find_booking_by_user(user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::CannotBookRoom(Refusal::NoBookingToUpdate))?;

  if current.id != booking_id {
    tracing::warn!(
      user_id,
      booking_id,
      owned = current.id,
      "refusing update of a booking the user does not hold"
    );
    return Err(Error::CannotBookRoom(Refusal::BookingNotOwned));
  }

  check_room_availability(store, room_id).await?;

  let placement = store
    .move_booking(booking_id, room_id)
    .await
    .map_err(Error::store)?;

  let booking_id = settle(placement)?;
  tracing::info!(
    user_id,
    booking_id,
    from_room = current.room.id,
    to_room = room_id,
    "booking moved"
  );
  Ok(booking_id)
}

fn settle(placement: Placement) -> Result<Id> {
  match placement {
    Placement::Placed(booking) => Ok(booking.id),
    Placement::RoomFull => Err(Error::CannotBookRoom(Refusal::RoomFull)),
    Placement::RoomMissing => Err(Error::NotFound(Resource::Room)),
    Placement::AlreadyBooked => {
      Err(Error::CannotBookRoom(Refusal::AlreadyBooked))
    }
    Placement::BookingMissing => Err(Error::NotFound(Resource::Booking)),
  }
}
