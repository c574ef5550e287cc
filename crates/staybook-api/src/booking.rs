//! Handlers for `/booking` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/booking` | The caller's booking with its room; 404 if none |
//! | `POST` | `/booking` | Body: `{"roomId":1}`; returns `{"bookingId":…}` |
//! | `PUT`  | `/booking/{bookingId}` | Body: `{"roomId":2}`; moves the caller's booking |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use serde::{Deserialize, Serialize};
use staybook_core::{Id, booking::BookingWithRoom, resolver};

use crate::{AppState, Store, auth::AuthUser, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomBody {
  pub room_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
  pub booking_id: Id,
}

/// Ids are positive integers.
fn positive(id: i64, name: &str) -> Result<Id, ApiError> {
  if id >= 1 {
    Ok(id)
  } else {
    Err(ApiError::BadRequest(format!("{name} must be a positive integer")))
  }
}

/// A path id must parse as an integer and be positive.
pub(crate) fn path_id(
  path: Result<Path<Id>, PathRejection>,
  name: &str,
) -> Result<Id, ApiError> {
  let Path(id) =
    path.map_err(|_| ApiError::BadRequest(format!("{name} must be an integer")))?;
  positive(id, name)
}

/// A room id must be present and positive.
fn room_id(body: Result<Json<RoomBody>, JsonRejection>) -> Result<Id, ApiError> {
  let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let id = body
    .room_id
    .ok_or_else(|| ApiError::BadRequest("roomId is required".into()))?;
  positive(id, "roomId")
}

/// `GET /booking`
pub async fn get_own<S: Store>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<BookingWithRoom>, ApiError> {
  let booking = resolver::get_booking(state.store.as_ref(), user.user_id).await?;
  Ok(Json(booking))
}

/// `POST /booking`
pub async fn create<S: Store>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  body: Result<Json<RoomBody>, JsonRejection>,
) -> Result<Json<BookingCreated>, ApiError> {
  let room_id = room_id(body)?;
  let booking_id =
    resolver::create_booking(state.store.as_ref(), user.user_id, room_id).await?;
  Ok(Json(BookingCreated { booking_id }))
}

/// `PUT /booking/{bookingId}`
pub async fn update<S: Store>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  path: Result<Path<Id>, PathRejection>,
  body: Result<Json<RoomBody>, JsonRejection>,
) -> Result<Json<BookingCreated>, ApiError> {
  let booking_id = path_id(path, "bookingId")?;
  let room_id = room_id(body)?;

  let booking_id = resolver::update_booking(
    state.store.as_ref(),
    user.user_id,
    room_id,
    booking_id,
  )
  .await?;
  Ok(Json(BookingCreated { booking_id }))
}
