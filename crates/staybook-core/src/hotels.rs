//! Hotel listing and single-hotel lookup.

use crate::{
  Error, Id, Resource, Result,
  eligibility::check_hotel_view_permission,
  hotel::{Hotel, HotelWithRooms},
  store::BookingStore,
};

/// Every hotel, for a user whose ticket allows viewing them.
pub async fn list_hotels<S: BookingStore>(
  store: &S,
  user_id: Id,
) -> Result<Vec<Hotel>> {
  check_hotel_view_permission(store, user_id).await?;
  store.list_hotels().await.map_err(Error::store)
}

/// One hotel with its rooms. Not gated on ticket eligibility.
pub async fn get_hotel<S: BookingStore>(
  store: &S,
  hotel_id: Id,
) -> Result<HotelWithRooms> {
  store
    .find_hotel_with_rooms(hotel_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound(Resource::Hotel))
}
