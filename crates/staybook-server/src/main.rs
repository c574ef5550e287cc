//! staybook-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, optionally seeds it from a JSON fixture, and
//! serves the booking API over HTTP.
//!
//! # Password hash generation
//!
//! Fixture users carry an argon2 PHC string rather than a password:
//!
//! ```
//! cargo run -p staybook-server -- --hash-password
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use staybook_api::{AppState, auth::hash_password};
use staybook_server::{expand_tilde, load_config};
use staybook_store_sqlite::{Fixture, SqliteStore};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Staybook hotel booking server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load a JSON fixture into the store before serving.
  #[arg(long, value_name = "JSON")]
  seed: Option<PathBuf>,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let hash = hash_password(&password)?;
    println!("{hash}");
    return Ok(());
  }

  let server_cfg = load_config(&cli.config).context("failed to load configuration")?;
  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(seed) = &cli.seed {
    seed_store(&store, seed).await?;
  }

  let state = AppState::new(store, server_cfg.auth_config());
  let app = staybook_server::app(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn seed_store(store: &SqliteStore, path: &Path) -> anyhow::Result<()> {
  let raw = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read fixture {path:?}"))?;
  let fixture: Fixture =
    serde_json::from_str(&raw).with_context(|| format!("invalid fixture {path:?}"))?;
  let summary = store
    .load_fixture(&fixture)
    .await
    .context("failed to load fixture")?;
  tracing::info!(
    users = summary.users,
    hotels = summary.hotels,
    rooms = summary.rooms,
    "store seeded from {}",
    path.display()
  );
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
