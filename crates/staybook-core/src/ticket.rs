//! Enrollment, ticket and ticket-type records.
//!
//! These are read-only inputs to the booking rules: enrollments and tickets
//! are created by registration and payment flows that live outside Staybook.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

// ─── Enrollment ──────────────────────────────────────────────────────────────

/// A user's registration for the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
  pub id:         Id,
  pub user_id:    Id,
  pub name:       String,
  pub address:    Address,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
  pub street:      String,
  pub city:        String,
  pub state:       String,
  pub postal_code: String,
}

// ─── Ticket ──────────────────────────────────────────────────────────────────

/// Payment status of a ticket. Tickets are created `Reserved` and become
/// `Paid` once the payment provider confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketStatus {
  Reserved,
  Paid,
}

/// Category of ticket: price plus the two flags the booking rules read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
  pub id:             Id,
  pub name:           String,
  /// Price in cents.
  pub price:          i64,
  pub is_remote:      bool,
  pub includes_hotel: bool,
}

/// A ticket with its type already joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
  pub id:            Id,
  pub enrollment_id: Id,
  pub status:        TicketStatus,
  pub ticket_type:   TicketType,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl Ticket {
  pub fn is_paid(&self) -> bool { self.status == TicketStatus::Paid }
}
