//! Handlers for `/hotels` endpoints.

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use staybook_core::{
  Id,
  hotel::{Hotel, HotelWithRooms},
  hotels,
};

use crate::{AppState, Store, auth::AuthUser, booking::path_id, error::ApiError};

/// `GET /hotels`, gated on a paid ticket that includes a hotel.
pub async fn list<S: Store>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<Vec<Hotel>>, ApiError> {
  let hotels = hotels::list_hotels(state.store.as_ref(), user.user_id).await?;
  Ok(Json(hotels))
}

/// `GET /hotels/{hotelId}`
pub async fn get_one<S: Store>(
  State(state): State<AppState<S>>,
  _user: AuthUser,
  path: Result<Path<Id>, PathRejection>,
) -> Result<Json<HotelWithRooms>, ApiError> {
  let hotel_id = path_id(path, "hotelId")?;
  let hotel = hotels::get_hotel(state.store.as_ref(), hotel_id).await?;
  Ok(Json(hotel))
}
