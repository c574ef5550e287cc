//! Server wiring for Staybook: configuration and the top-level router.
//!
//! The binary in `main.rs` is a thin shell around these pieces.

use std::path::{Path, PathBuf};

use axum::Router;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;
use staybook_api::{AppState, AuthConfig, Store, api_router};
use tower_http::trace::TraceLayer;

/// Prefix for environment overrides, e.g. `STAYBOOK_PORT=8080`.
pub const ENV_PREFIX: &str = "STAYBOOK";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  pub jwt_secret:      String,
  pub token_ttl_hours: u32,
}

impl ServerConfig {
  pub fn auth_config(&self) -> AuthConfig {
    AuthConfig {
      jwt_secret: self.jwt_secret.clone(),
      token_ttl:  chrono::Duration::hours(i64::from(self.token_ttl_hours)),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

fn with_defaults(
  builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
  builder
    .set_default("host", "127.0.0.1")?
    .set_default("port", 4000)?
    .set_default("store_path", "staybook.db")?
    .set_default("token_ttl_hours", 24)
}

/// Load configuration from `path` (optional) layered under `STAYBOOK_*`
/// environment variables. `jwt_secret` has no default and must be supplied.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
  let config = with_defaults(Config::builder())?
    .add_source(File::from(path).required(false))
    .add_source(Environment::with_prefix(ENV_PREFIX))
    .build()?;
  let server: ServerConfig = config.try_deserialize()?;

  if server.jwt_secret.is_empty() {
    return Err(ConfigError::Message("jwt_secret must not be empty".into()));
  }
  Ok(server)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with request tracing applied.
pub fn app<S: Store>(state: AppState<S>) -> Router {
  api_router(state).layer(TraceLayer::new_for_http())
}
