//! Core types and booking rules for Staybook.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! rule components ([`eligibility`], [`capacity`], [`resolver`], [`hotels`])
//! are stateless async functions that take their store as an explicit
//! parameter; any backend implementing [`store::BookingStore`] can drive them.

pub mod account;
pub mod booking;
pub mod capacity;
pub mod eligibility;
pub mod error;
pub mod hotel;
pub mod hotels;
pub mod resolver;
pub mod store;
pub mod ticket;

pub use error::{Error, Refusal, Resource, Result};

/// Every persisted entity is keyed by a positive integer.
pub type Id = i64;

#[cfg(test)]
mod tests;
