//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Ticket status is stored as
//! its uppercase name. Booleans are stored as 0/1 integers.

use chrono::{DateTime, Utc};
use staybook_core::{
  Id,
  account::{Session, User},
  booking::{Booking, Placement},
  hotel::{Hotel, Room},
  ticket::{Address, Enrollment, Ticket, TicketStatus, TicketType},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── TicketStatus ────────────────────────────────────────────────────────────

pub fn encode_ticket_status(s: TicketStatus) -> &'static str {
  match s {
    TicketStatus::Reserved => "RESERVED",
    TicketStatus::Paid => "PAID",
  }
}

pub fn decode_ticket_status(s: &str) -> Result<TicketStatus> {
  match s {
    "RESERVED" => Ok(TicketStatus::Reserved),
    "PAID" => Ok(TicketStatus::Paid),
    other => Err(Error::UnknownTicketStatus(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:            Id,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      created_at:    row.get(3)?,
      updated_at:    row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            self.id,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `sessions` row.
pub struct RawSession {
  pub id:         Id,
  pub user_id:    Id,
  pub token_hash: String,
  pub created_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      id:         self.id,
      user_id:    self.user_id,
      token_hash: self.token_hash,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `enrollments` row.
pub struct RawEnrollment {
  pub id:          Id,
  pub user_id:     Id,
  pub name:        String,
  pub street:      String,
  pub city:        String,
  pub state:       String,
  pub postal_code: String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawEnrollment {
  pub fn into_enrollment(self) -> Result<Enrollment> {
    Ok(Enrollment {
      id:         self.id,
      user_id:    self.user_id,
      name:       self.name,
      address:    Address {
        street:      self.street,
        city:        self.city,
        state:       self.state,
        postal_code: self.postal_code,
      },
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read from a `tickets` row joined with its `ticket_types` row.
pub struct RawTicket {
  // tickets columns
  pub id:             Id,
  pub enrollment_id:  Id,
  pub status:         String,
  pub created_at:     String,
  pub updated_at:     String,
  // ticket_types join
  pub type_id:        Id,
  pub type_name:      String,
  pub price:          i64,
  pub is_remote:      bool,
  pub includes_hotel: bool,
}

impl RawTicket {
  pub fn into_ticket(self) -> Result<Ticket> {
    Ok(Ticket {
      id:            self.id,
      enrollment_id: self.enrollment_id,
      status:        decode_ticket_status(&self.status)?,
      ticket_type:   TicketType {
        id:             self.type_id,
        name:           self.type_name,
        price:          self.price,
        is_remote:      self.is_remote,
        includes_hotel: self.includes_hotel,
      },
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `hotels` row.
pub struct RawHotel {
  pub id:         Id,
  pub name:       String,
  pub image:      String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawHotel {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      image:      row.get(2)?,
      created_at: row.get(3)?,
      updated_at: row.get(4)?,
    })
  }

  pub fn into_hotel(self) -> Result<Hotel> {
    Ok(Hotel {
      id:         self.id,
      name:       self.name,
      image:      self.image,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read from a `rooms` row. Columns are expected in the order
/// `id, name, capacity, hotel_id, created_at, updated_at`, starting at
/// `first`.
pub struct RawRoom {
  pub id:         Id,
  pub name:       String,
  pub capacity:   i64,
  pub hotel_id:   Id,
  pub created_at: String,
  pub updated_at: String,
}

impl RawRoom {
  pub fn from_row(row: &rusqlite::Row<'_>, first: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(first)?,
      name:       row.get(first + 1)?,
      capacity:   row.get(first + 2)?,
      hotel_id:   row.get(first + 3)?,
      created_at: row.get(first + 4)?,
      updated_at: row.get(first + 5)?,
    })
  }

  pub fn into_room(self) -> Result<Room> {
    Ok(Room {
      id:         self.id,
      name:       self.name,
      capacity:   self.capacity,
      hotel_id:   self.hotel_id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values of a `bookings` row.
pub struct RawBooking {
  pub id:         Id,
  pub user_id:    Id,
  pub room_id:    Id,
  pub created_at: String,
  pub updated_at: String,
}

impl RawBooking {
  pub fn into_booking(self) -> Result<Booking> {
    Ok(Booking {
      id:         self.id,
      user_id:    self.user_id,
      room_id:    self.room_id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// [`Placement`] as produced inside a database transaction, before the
/// booking timestamps are decoded.
pub enum RawPlacement {
  Placed(RawBooking),
  RoomFull,
  RoomMissing,
  AlreadyBooked,
  BookingMissing,
}

impl RawPlacement {
  pub fn into_placement(self) -> Result<Placement> {
    Ok(match self {
      Self::Placed(raw) => Placement::Placed(raw.into_booking()?),
      Self::RoomFull => Placement::RoomFull,
      Self::RoomMissing => Placement::RoomMissing,
      Self::AlreadyBooked => Placement::AlreadyBooked,
      Self::BookingMissing => Placement::BookingMissing,
    })
  }
}
