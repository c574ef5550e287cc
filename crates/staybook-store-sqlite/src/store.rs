//! [`SqliteStore`], the SQLite implementation of [`BookingStore`] and
//! [`AccountStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use staybook_core::{
  Id,
  account::{Session, User},
  booking::{BookingWithRoom, Placement},
  hotel::{Hotel, HotelWithRooms, Room},
  store::{AccountStore, BookingStore},
  ticket::{Enrollment, Ticket},
};

use crate::{
  Result,
  encode::{
    RawBooking, RawEnrollment, RawHotel, RawPlacement, RawRoom, RawSession,
    RawTicket, RawUser, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Staybook store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every call
/// runs on the connection's dedicated thread, one at a time.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── BookingStore impl ───────────────────────────────────────────────────────

impl BookingStore for SqliteStore {
  type Error = crate::Error;

  // ── Registration ──────────────────────────────────────────────────────────

  async fn find_enrollment_by_user(&self, user_id: Id) -> Result<Option<Enrollment>> {
    let raw: Option<RawEnrollment> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, user_id, name, street, city, state, postal_code,
                    created_at, updated_at
             FROM enrollments WHERE user_id = ?1",
            rusqlite::params![user_id],
            |row| {
              Ok(RawEnrollment {
                id:          row.get(0)?,
                user_id:     row.get(1)?,
                name:        row.get(2)?,
                street:      row.get(3)?,
                city:        row.get(4)?,
                state:       row.get(5)?,
                postal_code: row.get(6)?,
                created_at:  row.get(7)?,
                updated_at:  row.get(8)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEnrollment::into_enrollment).transpose()
  }

  async fn find_ticket_by_enrollment(&self, enrollment_id: Id) -> Result<Option<Ticket>> {
    let raw: Option<RawTicket> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT
               t.id, t.enrollment_id, t.status, t.created_at, t.updated_at,
               tt.id, tt.name, tt.price, tt.is_remote, tt.includes_hotel
             FROM tickets t
             JOIN ticket_types tt ON tt.id = t.ticket_type_id
             WHERE t.enrollment_id = ?1",
            rusqlite::params![enrollment_id],
            |row| {
              Ok(RawTicket {
                id:             row.get(0)?,
                enrollment_id:  row.get(1)?,
                status:         row.get(2)?,
                created_at:     row.get(3)?,
                updated_at:     row.get(4)?,
                type_id:        row.get(5)?,
                type_name:      row.get(6)?,
                price:          row.get(7)?,
                is_remote:      row.get(8)?,
                includes_hotel: row.get(9)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTicket::into_ticket).transpose()
  }

  // ── Rooms and bookings ────────────────────────────────────────────────────

  async fn find_room(&self, room_id: Id) -> Result<Option<Room>> {
    let raw: Option<RawRoom> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, name, capacity, hotel_id, created_at, updated_at
             FROM rooms WHERE id = ?1",
            rusqlite::params![room_id],
            |row| RawRoom::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRoom::into_room).transpose()
  }

  async fn count_room_bookings(&self, room_id: Id) -> Result<i64> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM bookings WHERE room_id = ?1",
          rusqlite::params![room_id],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(count)
  }

  async fn find_booking_by_user(&self, user_id: Id) -> Result<Option<BookingWithRoom>> {
    let raw: Option<(Id, RawRoom)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT
               b.id,
               r.id, r.name, r.capacity, r.hotel_id, r.created_at, r.updated_at
             FROM bookings b
             JOIN rooms r ON r.id = b.room_id
             WHERE b.user_id = ?1
             ORDER BY b.id
             LIMIT 1",
            rusqlite::params![user_id],
            |row| Ok((row.get(0)?, RawRoom::from_row(row, 1)?)),
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|(id, room)| Ok(BookingWithRoom { id, room: room.into_room()? }))
      .transpose()
  }

  async fn place_booking(&self, user_id: Id, room_id: Id) -> Result<Placement> {
    let now_str = encode_dt(Utc::now());

    let raw: RawPlacement = self
      .conn
      .call(move |conn| {
        // IMMEDIATE takes the write lock up front, so no other connection
        // can insert between the count and the insert below.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let capacity: Option<i64> = tx
          .query_row(
            "SELECT capacity FROM rooms WHERE id = ?1",
            rusqlite::params![room_id],
            |row| row.get(0),
          )
          .optional()?;
        let Some(capacity) = capacity else {
          return Ok(RawPlacement::RoomMissing);
        };

        let already_booked: bool = tx.query_row(
          "SELECT EXISTS (SELECT 1 FROM bookings WHERE user_id = ?1)",
          rusqlite::params![user_id],
          |row| row.get(0),
        )?;
        if already_booked {
          return Ok(RawPlacement::AlreadyBooked);
        }

        let booked: i64 = tx.query_row(
          "SELECT COUNT(*) FROM bookings WHERE room_id = ?1",
          rusqlite::params![room_id],
          |row| row.get(0),
        )?;
        if booked >= capacity {
          return Ok(RawPlacement::RoomFull);
        }

        tx.execute(
          "INSERT INTO bookings (user_id, room_id, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)",
          rusqlite::params![user_id, room_id, now_str],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(RawPlacement::Placed(RawBooking {
          id,
          user_id,
          room_id,
          created_at: now_str.clone(),
          updated_at: now_str,
        }))
      })
      .await?;

    raw.into_placement()
  }

  async fn move_booking(&self, booking_id: Id, room_id: Id) -> Result<Placement> {
    let now_str = encode_dt(Utc::now());

    let raw: RawPlacement = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let capacity: Option<i64> = tx
          .query_row(
            "SELECT capacity FROM rooms WHERE id = ?1",
            rusqlite::params![room_id],
            |row| row.get(0),
          )
          .optional()?;
        let Some(capacity) = capacity else {
          return Ok(RawPlacement::RoomMissing);
        };

        let existing: Option<(Id, String)> = tx
          .query_row(
            "SELECT user_id, created_at FROM bookings WHERE id = ?1",
            rusqlite::params![booking_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;
        let Some((user_id, created_at)) = existing else {
          return Ok(RawPlacement::BookingMissing);
        };

        let booked: i64 = tx.query_row(
          "SELECT COUNT(*) FROM bookings WHERE room_id = ?1",
          rusqlite::params![room_id],
          |row| row.get(0),
        )?;
        if booked >= capacity {
          return Ok(RawPlacement::RoomFull);
        }

        tx.execute(
          "UPDATE bookings SET room_id = ?1, updated_at = ?2 WHERE id = ?3",
          rusqlite::params![room_id, now_str, booking_id],
        )?;
        tx.commit()?;

        Ok(RawPlacement::Placed(RawBooking {
          id: booking_id,
          user_id,
          room_id,
          created_at,
          updated_at: now_str,
        }))
      })
      .await?;

    raw.into_placement()
  }

  // ── Hotels ────────────────────────────────────────────────────────────────

  async fn list_hotels(&self) -> Result<Vec<Hotel>> {
    let raws: Vec<RawHotel> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, image, created_at, updated_at FROM hotels ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], RawHotel::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHotel::into_hotel).collect()
  }

  async fn find_hotel_with_rooms(&self, hotel_id: Id) -> Result<Option<HotelWithRooms>> {
    let raw: Option<(RawHotel, Vec<RawRoom>)> = self
      .conn
      .call(move |conn| {
        let hotel = conn
          .query_row(
            "SELECT id, name, image, created_at, updated_at FROM hotels WHERE id = ?1",
            rusqlite::params![hotel_id],
            RawHotel::from_row,
          )
          .optional()?;
        let Some(hotel) = hotel else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(
          "SELECT id, name, capacity, hotel_id, created_at, updated_at
           FROM rooms WHERE hotel_id = ?1 ORDER BY id",
        )?;
        let rooms = stmt
          .query_map(rusqlite::params![hotel_id], |row| RawRoom::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((hotel, rooms)))
      })
      .await?;

    let Some((hotel, rooms)) = raw else {
      return Ok(None);
    };

    Ok(Some(HotelWithRooms {
      hotel: hotel.into_hotel()?,
      rooms: rooms
        .into_iter()
        .map(RawRoom::into_room)
        .collect::<Result<_>>()?,
    }))
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = crate::Error;

  async fn create_user(&self, email: String, password_hash: String) -> Result<Option<User>> {
    let now_str = encode_dt(Utc::now());

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO users (email, password_hash, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)
           ON CONFLICT (email) DO NOTHING",
          rusqlite::params![email, password_hash, now_str],
        )?;
        if inserted == 0 {
          return Ok(None);
        }

        Ok(Some(RawUser {
          id: conn.last_insert_rowid(),
          email,
          password_hash,
          created_at: now_str.clone(),
          updated_at: now_str,
        }))
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email(&self, email: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, email, password_hash, created_at, updated_at
             FROM users WHERE email = ?1",
            rusqlite::params![email],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn create_session(&self, user_id: Id, token_hash: String) -> Result<Session> {
    let now_str = encode_dt(Utc::now());

    let raw: RawSession = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (user_id, token_hash, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![user_id, token_hash, now_str],
        )?;
        Ok(RawSession {
          id: conn.last_insert_rowid(),
          user_id,
          token_hash,
          created_at: now_str,
        })
      })
      .await?;

    raw.into_session()
  }

  async fn find_session(&self, token_hash: String) -> Result<Option<Session>> {
    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, user_id, token_hash, created_at
             FROM sessions WHERE token_hash = ?1",
            rusqlite::params![token_hash],
            |row| {
              Ok(RawSession {
                id:         row.get(0)?,
                user_id:    row.get(1)?,
                token_hash: row.get(2)?,
                created_at: row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }
}
