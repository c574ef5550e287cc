//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs carrying the user id. A token is only accepted while
//! a session row keyed by its SHA-256 digest exists, so signing a token is not
//! enough on its own to reach an authenticated route.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use staybook_core::Id;
use uuid::Uuid;

use crate::{AppState, Store, error::ApiError};

/// Token signing settings for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  /// HMAC secret used to sign and verify tokens.
  pub jwt_secret: String,
  /// How long an issued token stays valid.
  pub token_ttl:  Duration,
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  /// The user's id.
  pub sub: Id,
  pub iat: i64,
  pub exp: i64,
  /// Unique per token, so two sign-ins in the same second differ.
  pub jti: String,
}

/// The authenticated caller. Present in a handler means the request carried a
/// valid token with a live session.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
  pub user_id: Id,
}

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Produce an argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// Sign a token for `user_id`.
pub fn issue_token(user_id: Id, config: &AuthConfig) -> Result<String, ApiError> {
  let now = Utc::now();
  let claims = Claims {
    sub: user_id,
    iat: now.timestamp(),
    exp: (now + config.token_ttl).timestamp(),
    jti: Uuid::new_v4().to_string(),
  };

  jsonwebtoken::encode(
    &Header::default(),
    &claims,
    &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
  )
  .map_err(|e| ApiError::Internal(format!("jwt error: {e}")))
}

/// Verify signature and expiry, returning the embedded claims.
pub fn decode_token(token: &str, config: &AuthConfig) -> Result<Claims, ApiError> {
  jsonwebtoken::decode::<Claims>(
    token,
    &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
    &Validation::default(),
  )
  .map(|data| data.claims)
  .map_err(|_| ApiError::Unauthenticated("invalid or expired token".into()))
}

/// Hex SHA-256 digest of a token; the form in which sessions are stored.
pub fn hash_token(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// Issue a token for `user_id` and persist its session.
pub async fn start_session<S: Store>(
  state: &AppState<S>,
  user_id: Id,
) -> Result<String, ApiError> {
  let token = issue_token(user_id, &state.auth)?;
  state
    .store
    .create_session(user_id, hash_token(&token))
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(user_id, "session started");
  Ok(token)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or_else(|| ApiError::Unauthenticated("missing bearer token".into()))
}

impl<S: Store> FromRequestParts<AppState<S>> for AuthUser {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?;
    let claims = decode_token(token, &state.auth)?;

    let session = state
      .store
      .find_session(hash_token(token))
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| ApiError::Unauthenticated("no session for token".into()))?;

    if session.user_id != claims.sub {
      return Err(ApiError::Unauthenticated("session does not match token".into()));
    }

    Ok(AuthUser { user_id: claims.sub })
  }
}
