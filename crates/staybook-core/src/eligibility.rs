//! Ticket-based permission checks.
//!
//! Two independent rule sets read the same enrollment → ticket → ticket type
//! chain. Booking requires a paid, in-person ticket that includes hotel;
//! viewing the hotel list requires only a paid ticket that includes hotel.

use crate::{
  Error, Id, Refusal, Resource, Result,
  store::BookingStore,
  ticket::{Ticket, TicketStatus},
};

/// Resolve the ticket held by `user_id`. A user without an enrollment is
/// reported as `NotFound(Enrollment)`.
async fn ticket_for_user<S: BookingStore>(
  store: &S,
  user_id: Id,
) -> Result<Option<Ticket>> {
  let enrollment = store
    .find_enrollment_by_user(user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound(Resource::Enrollment))?;

  store
    .find_ticket_by_enrollment(enrollment.id)
    .await
    .map_err(Error::store)
}

/// Fails with [`Error::CannotBookRoom`] unless the user's ticket is paid,
/// in-person, and includes hotel.
pub async fn check_booking_permission<S: BookingStore>(
  store: &S,
  user_id: Id,
) -> Result<()> {
  let ticket = ticket_for_user(store, user_id)
    .await?
    .ok_or(Error::CannotBookRoom(Refusal::NoTicket))?;

  if ticket.status == TicketStatus::Reserved {
    return Err(Error::CannotBookRoom(Refusal::TicketNotPaid));
  }
  if ticket.ticket_type.is_remote {
    return Err(Error::CannotBookRoom(Refusal::RemoteTicket));
  }
  if !ticket.ticket_type.includes_hotel {
    return Err(Error::CannotBookRoom(Refusal::HotelNotIncluded));
  }

  Ok(())
}

/// Fails with [`Error::Unauthorized`] unless the user's ticket is paid and
/// includes hotel. Remote tickets are not rejected here.
pub async fn check_hotel_view_permission<S: BookingStore>(
  store: &S,
  user_id: Id,
) -> Result<()> {
  let ticket = ticket_for_user(store, user_id)
    .await?
    .ok_or(Error::NotFound(Resource::Ticket))?;

  if !ticket.is_paid() {
    return Err(Error::Unauthorized(Refusal::TicketNotPaid));
  }
  if !ticket.ticket_type.includes_hotel {
    return Err(Error::Unauthorized(Refusal::HotelNotIncluded));
  }

  Ok(())
}
