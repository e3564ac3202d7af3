//! HTTP server assembly for Neko.
//!
//! Loads [`ServerConfig`] and builds the top-level axum [`Router`]: the JSON
//! API from `neko-api` nested under `/api`, wrapped in a request trace layer.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use neko_core::store::CatStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `NEKO_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Layer defaults, the optional TOML file at `path`, and the environment.
  pub fn load(path: impl Into<PathBuf>) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 3000)?
      .set_default("store_path", "neko.db")?
      .add_source(config::File::from(path.into()).required(false))
      .add_source(config::Environment::with_prefix("NEKO"))
      .build()?
      .try_deserialize()
  }

  /// `host:port`, ready for binding.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router for `store`.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: CatStore + 'static,
{
  Router::new()
    .nest("/api", neko_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
