//! Error type for `staybook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown ticket status: {0:?}")]
  UnknownTicketStatus(String),

  /// A fixture referenced a user or ticket type it does not define.
  #[error("fixture error: {0}")]
  Fixture(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
