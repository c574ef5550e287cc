//! The `BookingStore` and `AccountStore` traits.
//!
//! Both are implemented by storage backends (e.g. `staybook-store-sqlite`).
//! The rule components and the HTTP layer depend on these abstractions, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  Id,
  account::{Session, User},
  booking::{BookingWithRoom, Placement},
  hotel::{Hotel, HotelWithRooms, Room},
  ticket::{Enrollment, Ticket},
};

// ─── Booking data ────────────────────────────────────────────────────────────

/// Lookups and writes the booking rules depend on.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait BookingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Registration ──────────────────────────────────────────────────────

  /// The enrollment owned by `user_id`, if any.
  fn find_enrollment_by_user(
    &self,
    user_id: Id,
  ) -> impl Future<Output = Result<Option<Enrollment>, Self::Error>> + Send + '_;

  /// The ticket attached to an enrollment, with its type joined in.
  fn find_ticket_by_enrollment(
    &self,
    enrollment_id: Id,
  ) -> impl Future<Output = Result<Option<Ticket>, Self::Error>> + Send + '_;

  // ── Rooms and bookings ────────────────────────────────────────────────

  fn find_room(
    &self,
    room_id: Id,
  ) -> impl Future<Output = Result<Option<Room>, Self::Error>> + Send + '_;

  /// Number of bookings referencing `room_id`, whoever holds them.
  fn count_room_bookings(
    &self,
    room_id: Id,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// The booking held by `user_id` with its room embedded. If the backend
  /// holds several, the one with the lowest id is returned.
  fn find_booking_by_user(
    &self,
    user_id: Id,
  ) -> impl Future<Output = Result<Option<BookingWithRoom>, Self::Error>>
  + Send
  + '_;

  /// Insert a booking for `user_id` in `room_id`.
  ///
  /// The room lookup, the capacity count, and the insert must happen
  /// atomically with respect to every other `place_booking` and
  /// `move_booking` call.
  fn place_booking(
    &self,
    user_id: Id,
    room_id: Id,
  ) -> impl Future<Output = Result<Placement, Self::Error>> + Send + '_;

  /// Point an existing booking at `room_id`, under the same atomicity
  /// guarantee as [`place_booking`](Self::place_booking). The booking's own
  /// row counts towards the target room's occupancy.
  fn move_booking(
    &self,
    booking_id: Id,
    room_id: Id,
  ) -> impl Future<Output = Result<Placement, Self::Error>> + Send + '_;

  // ── Hotels ────────────────────────────────────────────────────────────

  /// All hotels, ordered by id.
  fn list_hotels(
    &self,
  ) -> impl Future<Output = Result<Vec<Hotel>, Self::Error>> + Send + '_;

  /// A hotel with its rooms (ordered by id). Returns `None` if not found.
  fn find_hotel_with_rooms(
    &self,
    hotel_id: Id,
  ) -> impl Future<Output = Result<Option<HotelWithRooms>, Self::Error>>
  + Send
  + '_;
}

// ─── Accounts ────────────────────────────────────────────────────────────────

/// Users and bearer-token sessions.
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Register a user. Returns `None` if `email` is already taken.
  fn create_user(
    &self,
    email: String,
    password_hash: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Persist a session for an issued token, keyed by the token's digest.
  fn create_session(
    &self,
    user_id: Id,
    token_hash: String,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  fn find_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;
}
