//! Users and their sign-in sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

/// A platform user. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:            Id,
  pub email:         String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Records that a bearer token was issued to a user and is still live.
///
/// Only the SHA-256 hex digest of the token is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
  pub id:         Id,
  pub user_id:    Id,
  pub token_hash: String,
  pub created_at: DateTime<Utc>,
}
