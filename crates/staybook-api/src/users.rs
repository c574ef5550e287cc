//! Handlers for account endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: `{"email":"…","password":"…"}`; 409 on taken email |
//! | `POST` | `/auth/sign-in` | Returns `{"user":{…},"token":"…"}`; 401 on bad credentials |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use staybook_core::{Id, account::User};

use crate::{
  AppState, Store,
  auth::{hash_password, start_session, verify_password},
  error::ApiError,
};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

/// The public view of a user.
#[derive(Debug, Serialize)]
pub struct UserView {
  pub id:    Id,
  pub email: String,
}

impl From<User> for UserView {
  fn from(user: User) -> Self {
    Self { id: user.id, email: user.email }
  }
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
  pub user:  UserView,
  pub token: String,
}

fn read_credentials(
  body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Credentials, ApiError> {
  let Json(creds) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  Ok(creds)
}

// ─── Sign up ─────────────────────────────────────────────────────────────────

/// `POST /users`
pub async fn sign_up<S: Store>(
  State(state): State<AppState<S>>,
  body: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let creds = read_credentials(body)?;
  let email = creds.email.trim().to_owned();

  if !email.contains('@') {
    return Err(ApiError::BadRequest("email must be a valid address".into()));
  }
  if creds.password.chars().count() < MIN_PASSWORD_LEN {
    return Err(ApiError::BadRequest(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }

  let password_hash = hash_password(&creds.password)?;
  let user = state
    .store
    .create_user(email, password_hash)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::Conflict("email already registered".into()))?;

  tracing::info!(user_id = user.id, "user registered");
  Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

// ─── Sign in ─────────────────────────────────────────────────────────────────

/// `POST /auth/sign-in`
pub async fn sign_in<S: Store>(
  State(state): State<AppState<S>>,
  body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<SignInResponse>, ApiError> {
  let creds = read_credentials(body)?;

  let user = state
    .store
    .find_user_by_email(creds.email.trim().to_owned())
    .await
    .map_err(ApiError::store)?
    .filter(|user| verify_password(&creds.password, &user.password_hash))
    .ok_or_else(|| ApiError::Unauthorized("email or password is incorrect".into()))?;

  let token = start_session(&state, user.id).await?;
  Ok(Json(SignInResponse { user: user.into(), token }))
}
