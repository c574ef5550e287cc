//! Integration tests for `SqliteStore` against an in-memory database.

use staybook_core::{
  Error as CoreError, Id, Refusal,
  booking::Placement,
  resolver::{create_booking, update_booking},
  store::{AccountStore, BookingStore},
  ticket::{Address, TicketStatus},
};

use crate::{Fixture, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// A user holding a ticket of type `ticket_type_id` with `status`.
async fn guest(s: &SqliteStore, email: &str, ticket_type_id: Id, status: TicketStatus) -> Id {
  let user = s
    .create_user(email.into(), "$argon2id$stub".into())
    .await
    .unwrap()
    .expect("fresh email");
  let enrollment = s
    .insert_enrollment(user.id, "Guest", &Address::default())
    .await
    .unwrap();
  s.insert_ticket(enrollment, ticket_type_id, status).await.unwrap();
  user.id
}

async fn room_with_capacity(s: &SqliteStore, capacity: i64) -> Id {
  let hotel = s.insert_hotel("Driven Resort", "https://example.com/h.png").await.unwrap();
  s.insert_room(hotel, "101", capacity).await.unwrap()
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_rejects_duplicate_email() {
  let s = store().await;

  let first = s.create_user("a@example.com".into(), "h".into()).await.unwrap();
  assert!(first.is_some());

  let second = s.create_user("a@example.com".into(), "h2".into()).await.unwrap();
  assert!(second.is_none());

  let found = s.find_user_by_email("a@example.com".into()).await.unwrap().unwrap();
  assert_eq!(found.id, first.unwrap().id);
  assert_eq!(found.password_hash, "h");
}

#[tokio::test]
async fn session_roundtrip() {
  let s = store().await;
  let user = s.create_user("a@example.com".into(), "h".into()).await.unwrap().unwrap();

  let session = s.create_session(user.id, "digest".into()).await.unwrap();
  let found = s.find_session("digest".into()).await.unwrap().unwrap();
  assert_eq!(found.id, session.id);
  assert_eq!(found.user_id, user.id);

  assert!(s.find_session("other".into()).await.unwrap().is_none());
}

// ─── Registration ────────────────────────────────────────────────────────────

#[tokio::test]
async fn ticket_is_joined_with_its_type() {
  let s = store().await;
  let tt = s.insert_ticket_type("Online", 10_000, true, false).await.unwrap();
  let user = guest(&s, "a@example.com", tt, TicketStatus::Reserved).await;

  let enrollment = s.find_enrollment_by_user(user).await.unwrap().unwrap();
  assert_eq!(enrollment.user_id, user);

  let ticket = s.find_ticket_by_enrollment(enrollment.id).await.unwrap().unwrap();
  assert_eq!(ticket.status, TicketStatus::Reserved);
  assert_eq!(ticket.ticket_type.id, tt);
  assert!(ticket.ticket_type.is_remote);
  assert!(!ticket.ticket_type.includes_hotel);
  assert_eq!(ticket.ticket_type.price, 10_000);
}

#[tokio::test]
async fn missing_enrollment_and_ticket_return_none() {
  let s = store().await;
  assert!(s.find_enrollment_by_user(1).await.unwrap().is_none());
  assert!(s.find_ticket_by_enrollment(1).await.unwrap().is_none());
}

// ─── Hotels ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_fixture_and_read_hotels() {
  let s = store().await;
  let fixture: Fixture = serde_json::from_str(
    r#"{
      "users": [{ "email": "guest@example.com", "passwordHash": "h" }],
      "ticketTypes": [
        { "name": "Presential + Hotel", "price": 60000, "isRemote": false, "includesHotel": true }
      ],
      "enrollments": [{
        "email": "guest@example.com",
        "name": "Guest",
        "address": { "street": "Rua A", "city": "Recife", "state": "PE", "postalCode": "50000-000" },
        "ticket": { "ticketType": "Presential + Hotel", "status": "PAID" }
      }],
      "hotels": [
        { "name": "Seaside", "image": "https://example.com/s.png",
          "rooms": [{ "name": "101", "capacity": 2 }, { "name": "102", "capacity": 3 }] },
        { "name": "Uptown", "image": "https://example.com/u.png" }
      ]
    }"#,
  )
  .unwrap();

  let summary = s.load_fixture(&fixture).await.unwrap();
  assert_eq!(summary.users, 1);
  assert_eq!(summary.enrollments, 1);
  assert_eq!(summary.hotels, 2);
  assert_eq!(summary.rooms, 2);

  let hotels = s.list_hotels().await.unwrap();
  let names: Vec<_> = hotels.iter().map(|h| h.name.as_str()).collect();
  assert_eq!(names, ["Seaside", "Uptown"]);

  let seaside = s.find_hotel_with_rooms(hotels[0].id).await.unwrap().unwrap();
  assert_eq!(seaside.rooms.len(), 2);
  assert_eq!(seaside.rooms[0].name, "101");
  assert_eq!(seaside.rooms[1].capacity, 3);
  assert!(seaside.rooms.iter().all(|r| r.hotel_id == seaside.hotel.id));

  let uptown = s.find_hotel_with_rooms(hotels[1].id).await.unwrap().unwrap();
  assert!(uptown.rooms.is_empty());

  let max_id = hotels.iter().map(|h| h.id).max().unwrap();
  assert!(s.find_hotel_with_rooms(max_id + 1).await.unwrap().is_none());
}

fn seed_fixture(ticket_type: &str, room_capacity: i64) -> Fixture {
  serde_json::from_value(serde_json::json!({
    "users": [{ "email": "guest@example.com", "passwordHash": "h" }],
    "ticketTypes": [
      { "name": "Presential + Hotel", "price": 60000, "isRemote": false, "includesHotel": true }
    ],
    "enrollments": [{
      "email": "guest@example.com",
      "name": "Guest",
      "address": { "street": "Rua A", "city": "Recife", "state": "PE", "postalCode": "50000-000" },
      "ticket": { "ticketType": ticket_type, "status": "PAID" }
    }],
    "hotels": [
      { "name": "Seaside", "image": "https://example.com/s.png",
        "rooms": [{ "name": "101", "capacity": room_capacity }] }
    ]
  }))
  .unwrap()
}

async fn guest_has_ticket(s: &SqliteStore) -> bool {
  let Some(user) = s.find_user_by_email("guest@example.com".into()).await.unwrap() else {
    return false;
  };
  let Some(enrollment) = s.find_enrollment_by_user(user.id).await.unwrap() else {
    return false;
  };
  s.find_ticket_by_enrollment(enrollment.id).await.unwrap().is_some()
}

#[tokio::test]
async fn unresolved_fixture_writes_nothing_and_corrected_one_loads() {
  let s = store().await;

  let bad = s.load_fixture(&seed_fixture("Nope", 1)).await;
  assert!(matches!(bad, Err(crate::Error::Fixture(_))));
  assert!(s.find_user_by_email("guest@example.com".into()).await.unwrap().is_none());

  let summary = s.load_fixture(&seed_fixture("Presential + Hotel", 1)).await.unwrap();
  assert_eq!(summary.enrollments, 1);
  assert_eq!(summary.tickets, 1);
  assert!(guest_has_ticket(&s).await);
}

#[tokio::test]
async fn fixture_failing_midway_is_rolled_back() {
  let s = store().await;

  // Capacity 0 violates the rooms CHECK after users and enrollments are
  // already written inside the transaction.
  let bad = s.load_fixture(&seed_fixture("Presential + Hotel", 0)).await;
  assert!(matches!(bad, Err(crate::Error::Database(_))));
  assert!(s.find_user_by_email("guest@example.com".into()).await.unwrap().is_none());
  assert!(s.list_hotels().await.unwrap().is_empty());

  let summary = s.load_fixture(&seed_fixture("Presential + Hotel", 2)).await.unwrap();
  assert_eq!(summary.users, 1);
  assert_eq!(summary.hotels, 1);
  assert_eq!(summary.rooms, 1);
  assert!(guest_has_ticket(&s).await);
}

#[tokio::test]
async fn reloading_a_fixture_reuses_existing_rows() {
  let s = store().await;
  let fixture = seed_fixture("Presential + Hotel", 2);

  let first = s.load_fixture(&fixture).await.unwrap();
  assert_eq!(first.users, 1);
  assert_eq!(first.ticket_types, 1);
  assert_eq!(first.tickets, 1);

  let second = s.load_fixture(&fixture).await.unwrap();
  assert_eq!(second, crate::FixtureSummary::default());

  let hotels = s.list_hotels().await.unwrap();
  assert_eq!(hotels.len(), 1);
  let seaside = s.find_hotel_with_rooms(hotels[0].id).await.unwrap().unwrap();
  assert_eq!(seaside.rooms.len(), 1);
  assert!(guest_has_ticket(&s).await);
}

// ─── Bookings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn place_booking_outcomes() {
  let s = store().await;
  let tt = s.insert_ticket_type("Hotel", 1, false, true).await.unwrap();
  let a = guest(&s, "a@example.com", tt, TicketStatus::Paid).await;
  let b = guest(&s, "b@example.com", tt, TicketStatus::Paid).await;
  let room = room_with_capacity(&s, 1).await;

  assert_eq!(s.place_booking(a, room + 100).await.unwrap(), Placement::RoomMissing);

  let Placement::Placed(booking) = s.place_booking(a, room).await.unwrap() else {
    panic!("expected placement");
  };
  assert_eq!(booking.user_id, a);
  assert_eq!(booking.room_id, room);
  assert_eq!(s.count_room_bookings(room).await.unwrap(), 1);

  assert_eq!(s.place_booking(a, room).await.unwrap(), Placement::AlreadyBooked);
  assert_eq!(s.place_booking(b, room).await.unwrap(), Placement::RoomFull);

  let held = s.find_booking_by_user(a).await.unwrap().unwrap();
  assert_eq!(held.id, booking.id);
  assert_eq!(held.room.id, room);
  assert_eq!(held.room.capacity, 1);
}

#[tokio::test]
async fn move_booking_counts_own_row_and_frees_old_room() {
  let s = store().await;
  let tt = s.insert_ticket_type("Hotel", 1, false, true).await.unwrap();
  let a = guest(&s, "a@example.com", tt, TicketStatus::Paid).await;
  let b = guest(&s, "b@example.com", tt, TicketStatus::Paid).await;
  let first = room_with_capacity(&s, 1).await;
  let second = room_with_capacity(&s, 1).await;

  let booking_id = create_booking(&s, a, first).await.unwrap();

  // The booking already fills its own room.
  assert_eq!(s.move_booking(booking_id, first).await.unwrap(), Placement::RoomFull);
  assert_eq!(s.move_booking(booking_id + 50, second).await.unwrap(), Placement::BookingMissing);

  let moved = update_booking(&s, a, second, booking_id).await.unwrap();
  assert_eq!(moved, booking_id);
  assert_eq!(s.count_room_bookings(first).await.unwrap(), 0);
  assert_eq!(s.count_room_bookings(second).await.unwrap(), 1);

  create_booking(&s, b, first).await.unwrap();
}

#[tokio::test]
async fn serial_creates_respect_capacity() {
  let s = store().await;
  let tt = s.insert_ticket_type("Hotel", 1, false, true).await.unwrap();
  let room = room_with_capacity(&s, 2).await;

  for i in 0..2 {
    let user = guest(&s, &format!("u{i}@example.com"), tt, TicketStatus::Paid).await;
    create_booking(&s, user, room).await.unwrap();
  }
  let late = guest(&s, "late@example.com", tt, TicketStatus::Paid).await;
  assert!(matches!(
    create_booking(&s, late, room).await,
    Err(CoreError::CannotBookRoom(Refusal::RoomFull))
  ));
  assert_eq!(s.count_room_bookings(room).await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_for_last_slot_never_overbook() {
  let s = store().await;
  let tt = s.insert_ticket_type("Hotel", 1, false, true).await.unwrap();
  let room = room_with_capacity(&s, 2).await;

  let mut users = Vec::new();
  for i in 0..8 {
    users.push(guest(&s, &format!("u{i}@example.com"), tt, TicketStatus::Paid).await);
  }

  let tasks: Vec<_> = users
    .into_iter()
    .map(|user| {
      let s = s.clone();
      tokio::spawn(async move { create_booking(&s, user, room).await })
    })
    .collect();

  let mut placed = 0;
  for task in tasks {
    match task.await.unwrap() {
      Ok(_) => placed += 1,
      Err(CoreError::CannotBookRoom(Refusal::RoomFull)) => {}
      Err(other) => panic!("unexpected error: {other}"),
    }
  }

  assert_eq!(placed, 2);
  assert_eq!(s.count_room_bookings(room).await.unwrap(), 2);
}
