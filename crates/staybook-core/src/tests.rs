//! Rule tests against an in-memory store.

use std::{convert::Infallible, sync::Mutex};

use chrono::Utc;

use crate::{
  Error, Id, Refusal, Resource,
  booking::{Booking, BookingWithRoom, Placement},
  capacity::check_room_availability,
  eligibility::{check_booking_permission, check_hotel_view_permission},
  hotel::{Hotel, HotelWithRooms, Room},
  hotels::{get_hotel, list_hotels},
  resolver::{create_booking, get_booking, update_booking},
  store::BookingStore,
  ticket::{Address, Enrollment, Ticket, TicketStatus, TicketType},
};

// ─── Fake store ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryStore {
  enrollments: Vec<Enrollment>,
  tickets:     Vec<Ticket>,
  hotels:      Vec<Hotel>,
  rooms:       Vec<Room>,
  bookings:    Mutex<Vec<Booking>>,
}

impl MemoryStore {
  fn enroll(&mut self, user_id: Id, ticket: Option<(TicketStatus, bool, bool)>) {
    let now = Utc::now();
    let enrollment_id = self.enrollments.len() as Id + 1;
    self.enrollments.push(Enrollment {
      id: enrollment_id,
      user_id,
      name: format!("user {user_id}"),
      address: Address::default(),
      created_at: now,
      updated_at: now,
    });
    if let Some((status, is_remote, includes_hotel)) = ticket {
      self.tickets.push(Ticket {
        id: self.tickets.len() as Id + 1,
        enrollment_id,
        status,
        ticket_type: TicketType {
          id: 1,
          name: "ticket".into(),
          price: 25_000,
          is_remote,
          includes_hotel,
        },
        created_at: now,
        updated_at: now,
      });
    }
  }

  fn add_room(&mut self, capacity: i64) -> Id {
    let now = Utc::now();
    if self.hotels.is_empty() {
      self.hotels.push(Hotel {
        id:         1,
        name:       "Driven Resort".into(),
        image:      "https://example.com/resort.png".into(),
        created_at: now,
        updated_at: now,
      });
    }
    let id = self.rooms.len() as Id + 1;
    self.rooms.push(Room {
      id,
      name: format!("room {id}"),
      capacity,
      hotel_id: 1,
      created_at: now,
      updated_at: now,
    });
    id
  }

  fn room(&self, room_id: Id) -> Option<Room> {
    self.rooms.iter().find(|r| r.id == room_id).cloned()
  }

  fn occupancy(&self, room_id: Id) -> usize {
    self
      .bookings
      .lock()
      .unwrap()
      .iter()
      .filter(|b| b.room_id == room_id)
      .count()
  }
}

impl BookingStore for MemoryStore {
  type Error = Infallible;

  async fn find_enrollment_by_user(
    &self,
    user_id: Id,
  ) -> Result<Option<Enrollment>, Infallible> {
    Ok(self.enrollments.iter().find(|e| e.user_id == user_id).cloned())
  }

  async fn find_ticket_by_enrollment(
    &self,
    enrollment_id: Id,
  ) -> Result<Option<Ticket>, Infallible> {
    Ok(
      self
        .tickets
        .iter()
        .find(|t| t.enrollment_id == enrollment_id)
        .cloned(),
    )
  }

  async fn find_room(&self, room_id: Id) -> Result<Option<Room>, Infallible> {
    Ok(self.room(room_id))
  }

  async fn count_room_bookings(&self, room_id: Id) -> Result<i64, Infallible> {
    Ok(self.occupancy(room_id) as i64)
  }

  async fn find_booking_by_user(
    &self,
    user_id: Id,
  ) -> Result<Option<BookingWithRoom>, Infallible> {
    let booking = self
      .bookings
      .lock()
      .unwrap()
      .iter()
      .find(|b| b.user_id == user_id)
      .cloned();
    Ok(booking.and_then(|b| {
      self.room(b.room_id).map(|room| BookingWithRoom { id: b.id, room })
    }))
  }

  async fn place_booking(
    &self,
    user_id: Id,
    room_id: Id,
  ) -> Result<Placement, Infallible> {
    let Some(room) = self.room(room_id) else {
      return Ok(Placement::RoomMissing);
    };
    let mut bookings = self.bookings.lock().unwrap();
    if bookings.iter().any(|b| b.user_id == user_id) {
      return Ok(Placement::AlreadyBooked);
    }
    if bookings.iter().filter(|b| b.room_id == room_id).count() as i64
      >= room.capacity
    {
      return Ok(Placement::RoomFull);
    }
    let now = Utc::now();
    let booking = Booking {
      id: bookings.len() as Id + 1,
      user_id,
      room_id,
      created_at: now,
      updated_at: now,
    };
    bookings.push(booking.clone());
    Ok(Placement::Placed(booking))
  }

  async fn move_booking(
    &self,
    booking_id: Id,
    room_id: Id,
  ) -> Result<Placement, Infallible> {
    let Some(room) = self.room(room_id) else {
      return Ok(Placement::RoomMissing);
    };
    let mut bookings = self.bookings.lock().unwrap();
    if bookings.iter().filter(|b| b.room_id == room_id).count() as i64
      >= room.capacity
    {
      return Ok(Placement::RoomFull);
    }
    let Some(booking) = bookings.iter_mut().find(|b| b.id == booking_id) else {
      return Ok(Placement::BookingMissing);
    };
    booking.room_id = room_id;
    booking.updated_at = Utc::now();
    Ok(Placement::Placed(booking.clone()))
  }

  async fn list_hotels(&self) -> Result<Vec<Hotel>, Infallible> {
    Ok(self.hotels.clone())
  }

  async fn find_hotel_with_rooms(
    &self,
    hotel_id: Id,
  ) -> Result<Option<HotelWithRooms>, Infallible> {
    Ok(self.hotels.iter().find(|h| h.id == hotel_id).map(|hotel| {
      HotelWithRooms {
        hotel: hotel.clone(),
        rooms: self
          .rooms
          .iter()
          .filter(|r| r.hotel_id == hotel_id)
          .cloned()
          .collect(),
      }
    }))
  }
}

const PAID_HOTEL: (TicketStatus, bool, bool) = (TicketStatus::Paid, false, true);

fn refused(result: crate::Result<impl std::fmt::Debug>) -> Refusal {
  match result {
    Err(Error::CannotBookRoom(r)) => r,
    other => panic!("expected CannotBookRoom, got {other:?}"),
  }
}

// ─── Eligibility ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn booking_permission_requires_enrollment() {
  let store = MemoryStore::default();
  let err = check_booking_permission(&store, 1).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(Resource::Enrollment)));
}

#[tokio::test]
async fn booking_permission_rejects_each_ticket_defect() {
  let cases = [
    (None, Refusal::NoTicket),
    (Some((TicketStatus::Reserved, false, true)), Refusal::TicketNotPaid),
    (Some((TicketStatus::Paid, true, true)), Refusal::RemoteTicket),
    (Some((TicketStatus::Paid, false, false)), Refusal::HotelNotIncluded),
  ];

  for (ticket, expected) in cases {
    let mut store = MemoryStore::default();
    store.enroll(7, ticket);
    assert_eq!(refused(check_booking_permission(&store, 7).await), expected);
  }
}

#[tokio::test]
async fn booking_permission_accepts_paid_hotel_ticket() {
  let mut store = MemoryStore::default();
  store.enroll(7, Some(PAID_HOTEL));
  check_booking_permission(&store, 7).await.unwrap();
}

#[tokio::test]
async fn hotel_view_ignores_remote_flag() {
  let mut store = MemoryStore::default();
  store.enroll(7, Some((TicketStatus::Paid, true, true)));
  check_hotel_view_permission(&store, 7).await.unwrap();
}

#[tokio::test]
async fn hotel_view_rejections() {
  let mut store = MemoryStore::default();
  store.enroll(1, None);
  store.enroll(2, Some((TicketStatus::Reserved, false, true)));
  store.enroll(3, Some((TicketStatus::Paid, false, false)));

  assert!(matches!(
    check_hotel_view_permission(&store, 1).await,
    Err(Error::NotFound(Resource::Ticket))
  ));
  assert!(matches!(
    check_hotel_view_permission(&store, 2).await,
    Err(Error::Unauthorized(Refusal::TicketNotPaid))
  ));
  assert!(matches!(
    check_hotel_view_permission(&store, 3).await,
    Err(Error::Unauthorized(Refusal::HotelNotIncluded))
  ));
  assert!(matches!(
    check_hotel_view_permission(&store, 4).await,
    Err(Error::NotFound(Resource::Enrollment))
  ));
}

// ─── Capacity ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_room_is_an_error_not_a_pass() {
  let store = MemoryStore::default();
  let err = check_room_availability(&store, 99).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(Resource::Room)));
}

#[tokio::test]
async fn room_is_full_when_count_equals_capacity() {
  let mut store = MemoryStore::default();
  store.enroll(1, Some(PAID_HOTEL));
  let room = store.add_room(1);

  let available = check_room_availability(&store, room).await.unwrap();
  assert_eq!(available.id, room);

  create_booking(&store, 1, room).await.unwrap();
  assert_eq!(
    refused(check_room_availability(&store, room).await),
    Refusal::RoomFull
  );
}

// ─── Resolver ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn eligibility_takes_precedence_over_missing_room() {
  let mut store = MemoryStore::default();
  store.enroll(1, Some((TicketStatus::Paid, true, true)));
  assert_eq!(
    refused(create_booking(&store, 1, 404).await),
    Refusal::RemoteTicket
  );
}

#[tokio::test]
async fn create_then_get_booking() {
  let mut store = MemoryStore::default();
  store.enroll(1, Some(PAID_HOTEL));
  let room = store.add_room(2);

  let booking_id = create_booking(&store, 1, room).await.unwrap();
  let booking = get_booking(&store, 1).await.unwrap();
  assert_eq!(booking.id, booking_id);
  assert_eq!(booking.room.id, room);
}

#[tokio::test]
async fn get_booking_without_one_is_not_found() {
  let store = MemoryStore::default();
  assert!(matches!(
    get_booking(&store, 1).await,
    Err(Error::NotFound(Resource::Booking))
  ));
}

#[tokio::test]
async fn serial_creates_stop_at_capacity() {
  let mut store = MemoryStore::default();
  for user in 1..=3 {
    store.enroll(user, Some(PAID_HOTEL));
  }
  let room = store.add_room(2);

  create_booking(&store, 1, room).await.unwrap();
  create_booking(&store, 2, room).await.unwrap();
  assert_eq!(refused(create_booking(&store, 3, room).await), Refusal::RoomFull);
  assert_eq!(store.occupancy(room), 2);
}

#[tokio::test]
async fn update_without_booking_is_refused_even_for_missing_room() {
  let store = MemoryStore::default();
  assert_eq!(
    refused(update_booking(&store, 1, 404, 1).await),
    Refusal::NoBookingToUpdate
  );
}

#[tokio::test]
async fn update_of_foreign_booking_is_refused() {
  let mut store = MemoryStore::default();
  store.enroll(1, Some(PAID_HOTEL));
  store.enroll(2, Some(PAID_HOTEL));
  let room = store.add_room(3);
  let other = store.add_room(3);

  let mine = create_booking(&store, 1, room).await.unwrap();
  let theirs = create_booking(&store, 2, room).await.unwrap();
  assert_ne!(mine, theirs);

  assert_eq!(
    refused(update_booking(&store, 1, other, theirs).await),
    Refusal::BookingNotOwned
  );
}

#[tokio::test]
async fn update_moves_booking_and_frees_old_room() {
  let mut store = MemoryStore::default();
  store.enroll(1, Some(PAID_HOTEL));
  store.enroll(2, Some(PAID_HOTEL));
  let first = store.add_room(1);
  let second = store.add_room(1);

  let booking_id = create_booking(&store, 1, first).await.unwrap();
  let moved = update_booking(&store, 1, second, booking_id).await.unwrap();
  assert_eq!(moved, booking_id);
  assert_eq!(get_booking(&store, 1).await.unwrap().room.id, second);

  create_booking(&store, 2, first).await.unwrap();
  assert_eq!(store.occupancy(first), 1);
}

// ─── Hotels ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_hotels_is_gated_but_single_lookup_is_not() {
  let mut store = MemoryStore::default();
  store.enroll(1, Some((TicketStatus::Reserved, false, true)));
  store.add_room(4);

  assert!(matches!(
    list_hotels(&store, 1).await,
    Err(Error::Unauthorized(Refusal::TicketNotPaid))
  ));

  let hotel = get_hotel(&store, 1).await.unwrap();
  assert_eq!(hotel.rooms.len(), 1);
  assert!(matches!(
    get_hotel(&store, 2).await,
    Err(Error::NotFound(Resource::Hotel))
  ));
}
