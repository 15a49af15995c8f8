//! HTTP server assembly for the supply inventory.
//!
//! Loads [`ServerConfig`] and mounts the JSON API under `/api` with request
//! tracing.

use std::path::{Path, PathBuf};

use axum::Router;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use stock_api::{AppState, OrderConfig, api_router};
use stock_core::store::InventoryStore;
use stock_store_sqlite::StoreOptions;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Prefix of environment variables overriding the config file, e.g.
/// `STOCK_PORT=9000`.
pub const ENV_PREFIX: &str = "STOCK";

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  /// The supplier's blank order form.
  pub template_path:        PathBuf,
  /// Where generated order forms are kept; not kept when unset.
  pub output_dir:           Option<PathBuf>,
  /// Refuse a second record with the same name in the same location.
  pub unique_name_location: bool,
}

impl ServerConfig {
  /// Read `path` (optional) with `STOCK_*` environment overrides on top.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::load_with(path, Environment::with_prefix(ENV_PREFIX))
  }

  fn load_with(path: &Path, env: Environment) -> Result<Self, ConfigError> {
    Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8000)?
      .set_default("store_path", "inventory.db")?
      .set_default("template_path", "BON_COMMANDE.docx")?
      .set_default("unique_name_location", false)?
      .add_source(File::from(path).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_options(&self) -> StoreOptions {
    StoreOptions { unique_name_location: self.unique_name_location }
  }

  pub fn order_config(&self) -> OrderConfig {
    OrderConfig {
      template_path: self.template_path.clone(),
      output_dir:    self.output_dir.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the API under `/api`, every request traced.
pub fn app<S>(state: AppState<S>) -> Router
where
  S: InventoryStore + Clone + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
