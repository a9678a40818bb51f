//! casebook-server binary.
//!
//! Reads `casebook.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API over HTTP under `/api`.

use std::path::PathBuf;

use anyhow::Context as _;
use casebook_server::{ServerConfig, expand_tilde};
use casebook_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Casebook case-management server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "casebook.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to read config from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = ?store_path, "store opened");

  let app     = casebook_server::app(store);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
