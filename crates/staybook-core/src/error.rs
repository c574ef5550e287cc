//! Error types for `staybook-core`.

use std::fmt;

use thiserror::Error;

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
  Booking,
  Room,
  Hotel,
  Enrollment,
  Ticket,
}

impl fmt::Display for Resource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Booking => "booking",
      Self::Room => "room",
      Self::Hotel => "hotel",
      Self::Enrollment => "enrollment",
      Self::Ticket => "ticket",
    })
  }
}

/// Why a business rule rejected the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
  NoTicket,
  TicketNotPaid,
  RemoteTicket,
  HotelNotIncluded,
  RoomFull,
  AlreadyBooked,
  NoBookingToUpdate,
  BookingNotOwned,
}

impl fmt::Display for Refusal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::NoTicket => "user has no ticket",
      Self::TicketNotPaid => "ticket is not paid",
      Self::RemoteTicket => "ticket is remote",
      Self::HotelNotIncluded => "ticket does not include hotel",
      Self::RoomFull => "room is at capacity",
      Self::AlreadyBooked => "user already holds a booking",
      Self::NoBookingToUpdate => "user has no booking to update",
      Self::BookingNotOwned => "booking does not belong to user",
    })
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} not found")]
  NotFound(Resource),

  #[error("cannot book room: {0}")]
  CannotBookRoom(Refusal),

  #[error("unauthorized: {0}")]
  Unauthorized(Refusal),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
