//! JSON REST API for Staybook.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`BookingStore`] and [`AccountStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = staybook_api::api_router(AppState::new(store, auth));
//! ```

pub mod auth;
pub mod booking;
pub mod error;
pub mod hotels;
pub mod users;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post, put},
};
use serde_json::json;
use staybook_core::store::{AccountStore, BookingStore};

pub use auth::{AuthConfig, AuthUser};
pub use error::ApiError;

/// Everything the handlers need. Implemented for any type providing both
/// store traits.
pub trait Store: BookingStore + AccountStore + 'static {}

impl<T> Store for T where T: BookingStore + AccountStore + 'static {}

/// Shared handler state.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

impl<S> AppState<S> {
  pub fn new(store: S, auth: AuthConfig) -> Self {
    Self { store: Arc::new(store), auth: Arc::new(auth) }
  }
}

// Manual impl so `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), auth: Arc::clone(&self.auth) }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: Store>(state: AppState<S>) -> Router<()> {
  Router::new()
    .route("/health", get(health))
    // Accounts
    .route("/users", post(users::sign_up::<S>))
    .route("/auth/sign-in", post(users::sign_in::<S>))
    // Bookings
    .route("/booking", get(booking::get_own::<S>).post(booking::create::<S>))
    .route("/booking/{bookingId}", put(booking::update::<S>))
    // Hotels
    .route("/hotels", get(hotels::list::<S>))
    .route("/hotels/{hotelId}", get(hotels::get_one::<S>))
    .with_state(state)
}

async fn health() -> Json<serde_json::Value> { Json(json!({ "status": "ok" })) }
