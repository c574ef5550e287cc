//! Reference-data inserts and the JSON fixture format used to seed a store.
//!
//! Hotels, rooms, ticket types, enrollments and tickets are owned by other
//! parts of the platform; Staybook only reads them. These inserts exist so a
//! fresh database (or a test) can be populated.
//!
//! A fixture loads in a single transaction. Records already present are
//! matched by natural key and reused, so the same fixture can be loaded
//! again on every start:
//!
//! | Record | Key |
//! |--------|-----|
//! | user | email |
//! | ticket type | name |
//! | enrollment | user |
//! | ticket | enrollment |
//! | hotel | name |
//! | room | hotel and name |

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior};
use serde::Deserialize;
use staybook_core::{
  Id,
  ticket::{Address, TicketStatus},
};

use crate::{
  Error, Result, SqliteStore,
  encode::{encode_dt, encode_ticket_status},
};

// ─── Fixture format ──────────────────────────────────────────────────────────

/// Top-level fixture document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixture {
  pub users:        Vec<FixtureUser>,
  pub ticket_types: Vec<FixtureTicketType>,
  pub enrollments:  Vec<FixtureEnrollment>,
  pub hotels:       Vec<FixtureHotel>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureUser {
  pub email:         String,
  /// argon2 PHC string, e.g. from `staybook-server --hash-password`.
  pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureTicketType {
  pub name:           String,
  pub price:          i64,
  pub is_remote:      bool,
  pub includes_hotel: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureEnrollment {
  /// Email of a user defined in the same fixture.
  pub email:   String,
  pub name:    String,
  pub address: Address,
  pub ticket:  Option<FixtureTicket>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureTicket {
  /// Name of a ticket type defined in the same fixture.
  pub ticket_type: String,
  pub status:      TicketStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureHotel {
  pub name:  String,
  pub image: String,
  #[serde(default)]
  pub rooms: Vec<FixtureRoom>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureRoom {
  pub name:     String,
  pub capacity: i64,
}

/// Rows newly written by [`SqliteStore::load_fixture`]. Reused rows are not
/// counted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSummary {
  pub users:        usize,
  pub ticket_types: usize,
  pub enrollments:  usize,
  pub tickets:      usize,
  pub hotels:       usize,
  pub rooms:        usize,
}

impl Fixture {
  /// Fail if an enrollment names a user or ticket type the fixture does not
  /// define. Runs before anything is written.
  fn check_references(&self) -> Result<()> {
    let users: HashSet<&str> = self.users.iter().map(|u| u.email.as_str()).collect();
    let types: HashSet<&str> =
      self.ticket_types.iter().map(|t| t.name.as_str()).collect();

    for enrollment in &self.enrollments {
      if !users.contains(enrollment.email.as_str()) {
        return Err(Error::Fixture(format!("unknown user {:?}", enrollment.email)));
      }
      if let Some(ticket) = &enrollment.ticket
        && !types.contains(ticket.ticket_type.as_str())
      {
        return Err(Error::Fixture(format!(
          "unknown ticket type {:?}",
          ticket.ticket_type
        )));
      }
    }
    Ok(())
  }
}

// ─── Row inserts ─────────────────────────────────────────────────────────────

fn insert_ticket_type_row(
  conn: &Connection,
  tt:   &FixtureTicketType,
) -> rusqlite::Result<Id> {
  conn.execute(
    "INSERT INTO ticket_types (name, price, is_remote, includes_hotel)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![tt.name, tt.price, tt.is_remote, tt.includes_hotel],
  )?;
  Ok(conn.last_insert_rowid())
}

fn insert_enrollment_row(
  conn:    &Connection,
  user_id: Id,
  name:    &str,
  address: &Address,
  now_str: &str,
) -> rusqlite::Result<Id> {
  conn.execute(
    "INSERT INTO enrollments (
       user_id, name, street, city, state, postal_code,
       created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    rusqlite::params![
      user_id,
      name,
      address.street,
      address.city,
      address.state,
      address.postal_code,
      now_str,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

fn insert_ticket_row(
  conn:           &Connection,
  enrollment_id:  Id,
  ticket_type_id: Id,
  status:         TicketStatus,
  now_str:        &str,
) -> rusqlite::Result<Id> {
  conn.execute(
    "INSERT INTO tickets (
       enrollment_id, ticket_type_id, status, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?4)",
    rusqlite::params![
      enrollment_id,
      ticket_type_id,
      encode_ticket_status(status),
      now_str
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

fn insert_hotel_row(
  conn:    &Connection,
  name:    &str,
  image:   &str,
  now_str: &str,
) -> rusqlite::Result<Id> {
  conn.execute(
    "INSERT INTO hotels (name, image, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?3)",
    rusqlite::params![name, image, now_str],
  )?;
  Ok(conn.last_insert_rowid())
}

fn insert_room_row(
  conn:     &Connection,
  hotel_id: Id,
  name:     &str,
  capacity: i64,
  now_str:  &str,
) -> rusqlite::Result<Id> {
  conn.execute(
    "INSERT INTO rooms (hotel_id, name, capacity, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?4)",
    rusqlite::params![hotel_id, name, capacity, now_str],
  )?;
  Ok(conn.last_insert_rowid())
}

fn find_id(
  conn:   &Connection,
  sql:    &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Option<Id>> {
  conn.query_row(sql, params, |row| row.get(0)).optional()
}

/// Write `fixture` through `conn`, reusing rows that already exist.
fn write_fixture(
  conn:    &Connection,
  fixture: &Fixture,
  now_str: &str,
) -> rusqlite::Result<FixtureSummary> {
  let mut summary = FixtureSummary::default();

  let mut users: HashMap<&str, Id> = HashMap::new();
  for user in &fixture.users {
    summary.users += conn.execute(
      "INSERT INTO users (email, password_hash, created_at, updated_at)
       VALUES (?1, ?2, ?3, ?3)
       ON CONFLICT (email) DO NOTHING",
      rusqlite::params![user.email, user.password_hash, now_str],
    )?;
    let id: Id = conn.query_row(
      "SELECT id FROM users WHERE email = ?1",
      rusqlite::params![user.email],
      |row| row.get(0),
    )?;
    users.insert(user.email.as_str(), id);
  }

  let mut ticket_types: HashMap<&str, Id> = HashMap::new();
  for tt in &fixture.ticket_types {
    let existing = find_id(
      conn,
      "SELECT id FROM ticket_types WHERE name = ?1 ORDER BY id LIMIT 1",
      rusqlite::params![tt.name],
    )?;
    let id = match existing {
      Some(id) => id,
      None => {
        summary.ticket_types += 1;
        insert_ticket_type_row(conn, tt)?
      }
    };
    ticket_types.insert(tt.name.as_str(), id);
  }

  // References were checked by `Fixture::check_references`.
  for enrollment in &fixture.enrollments {
    let Some(&user_id) = users.get(enrollment.email.as_str()) else {
      continue;
    };
    let existing = find_id(
      conn,
      "SELECT id FROM enrollments WHERE user_id = ?1",
      rusqlite::params![user_id],
    )?;
    let enrollment_id = match existing {
      Some(id) => id,
      None => {
        summary.enrollments += 1;
        insert_enrollment_row(conn, user_id, &enrollment.name, &enrollment.address, now_str)?
      }
    };

    let Some(ticket) = &enrollment.ticket else { continue };
    let Some(&type_id) = ticket_types.get(ticket.ticket_type.as_str()) else {
      continue;
    };
    let has_ticket = find_id(
      conn,
      "SELECT id FROM tickets WHERE enrollment_id = ?1",
      rusqlite::params![enrollment_id],
    )?
    .is_some();
    if !has_ticket {
      insert_ticket_row(conn, enrollment_id, type_id, ticket.status, now_str)?;
      summary.tickets += 1;
    }
  }

  for hotel in &fixture.hotels {
    let existing = find_id(
      conn,
      "SELECT id FROM hotels WHERE name = ?1 ORDER BY id LIMIT 1",
      rusqlite::params![hotel.name],
    )?;
    let hotel_id = match existing {
      Some(id) => id,
      None => {
        summary.hotels += 1;
        insert_hotel_row(conn, &hotel.name, &hotel.image, now_str)?
      }
    };

    for room in &hotel.rooms {
      let existing = find_id(
        conn,
        "SELECT id FROM rooms WHERE hotel_id = ?1 AND name = ?2 ORDER BY id LIMIT 1",
        rusqlite::params![hotel_id, room.name],
      )?;
      if existing.is_none() {
        insert_room_row(conn, hotel_id, &room.name, room.capacity, now_str)?;
        summary.rooms += 1;
      }
    }
  }

  Ok(summary)
}

// ─── Store methods ───────────────────────────────────────────────────────────

impl SqliteStore {
  pub async fn insert_ticket_type(
    &self,
    name:           &str,
    price:          i64,
    is_remote:      bool,
    includes_hotel: bool,
  ) -> Result<Id> {
    let tt = FixtureTicketType {
      name: name.to_owned(),
      price,
      is_remote,
      includes_hotel,
    };
    let id = self
      .conn
      .call(move |conn| Ok(insert_ticket_type_row(conn, &tt)?))
      .await?;
    Ok(id)
  }

  pub async fn insert_enrollment(
    &self,
    user_id: Id,
    name:    &str,
    address: &Address,
  ) -> Result<Id> {
    let name    = name.to_owned();
    let address = address.clone();
    let now_str = encode_dt(Utc::now());
    let id = self
      .conn
      .call(move |conn| {
        Ok(insert_enrollment_row(conn, user_id, &name, &address, &now_str)?)
      })
      .await?;
    Ok(id)
  }

  pub async fn insert_ticket(
    &self,
    enrollment_id:  Id,
    ticket_type_id: Id,
    status:         TicketStatus,
  ) -> Result<Id> {
    let now_str = encode_dt(Utc::now());
    let id = self
      .conn
      .call(move |conn| {
        Ok(insert_ticket_row(conn, enrollment_id, ticket_type_id, status, &now_str)?)
      })
      .await?;
    Ok(id)
  }

  pub async fn insert_hotel(&self, name: &str, image: &str) -> Result<Id> {
    let name    = name.to_owned();
    let image   = image.to_owned();
    let now_str = encode_dt(Utc::now());
    let id = self
      .conn
      .call(move |conn| Ok(insert_hotel_row(conn, &name, &image, &now_str)?))
      .await?;
    Ok(id)
  }

  pub async fn insert_room(&self, hotel_id: Id, name: &str, capacity: i64) -> Result<Id> {
    let name    = name.to_owned();
    let now_str = encode_dt(Utc::now());
    let id = self
      .conn
      .call(move |conn| {
        Ok(insert_room_row(conn, hotel_id, &name, capacity, &now_str)?)
      })
      .await?;
    Ok(id)
  }

  /// Write every record in `fixture` in one transaction. Any failure rolls
  /// the whole load back; records that already exist are reused.
  pub async fn load_fixture(&self, fixture: &Fixture) -> Result<FixtureSummary> {
    fixture.check_references()?;

    let fixture = fixture.clone();
    let now_str = encode_dt(Utc::now());
    let summary = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let summary = write_fixture(&tx, &fixture, &now_str)?;
        tx.commit()?;
        Ok(summary)
      })
      .await?;

    tracing::info!(?summary, "fixture loaded");
    Ok(summary)
  }
}
