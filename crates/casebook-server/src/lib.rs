//! HTTP server assembly for Casebook: configuration and the top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use casebook_store_sqlite::SqliteStore;
use config::{ConfigError, Environment, File, Source};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Prefix for environment overrides, e.g. `CASEBOOK_PORT=8080`.
pub const ENV_PREFIX: &str = "CASEBOOK";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `casebook.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5240 }

fn default_store_path() -> PathBuf { PathBuf::from("casebook.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      store_path: default_store_path(),
    }
  }
}

impl ServerConfig {
  /// Read `path` (if it exists) layered under `CASEBOOK_*` variables.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_source(File::from(path).required(false))
  }

  fn from_source<T>(file: T) -> Result<Self, ConfigError>
  where
    T: Source + Send + Sync + 'static,
  {
    config::Config::builder()
      .add_source(file)
      .add_source(Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
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

/// The full application: the JSON API under `/api`, with request tracing.
pub fn app(store: SqliteStore) -> Router {
  Router::new()
    .nest("/api", casebook_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
  };
  use config::FileFormat;
  use tower::ServiceExt as _;

  fn parse(toml: &str) -> ServerConfig {
    ServerConfig::from_source(File::from_str(toml, FileFormat::Toml)).unwrap()
  }

  #[test]
  fn empty_file_yields_defaults() {
    assert_eq!(parse(""), ServerConfig::default());
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = parse("port = 8080\nstore_path = \"/var/lib/casebook.db\"\n");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/casebook.db"));
    assert_eq!(cfg.address(), "127.0.0.1:8080");
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let cfg = ServerConfig::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
  }

  #[test]
  fn tilde_expansion() {
    let plain = Path::new("/tmp/casebook.db");
    assert_eq!(expand_tilde(plain), plain);

    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/casebook.db")),
        PathBuf::from(home).join("casebook.db")
      );
    }
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app   = app(store);

    let req  = Request::get("/api/matters").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!([]));

    let req  = Request::get("/matters").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
