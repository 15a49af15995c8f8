//! stock-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, makes sure every catalog product has a record in both
//! locations, and serves the JSON API over HTTP.
//!
//! Every setting can be overridden from the environment with the `STOCK_`
//! prefix, e.g. `STOCK_TEMPLATE_PATH=/srv/BON_COMMANDE.docx`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use stock_api::AppState;
use stock_core::store::InventoryStore;
use stock_server::ServerConfig;
use stock_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Dialysis supply inventory server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
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

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?
    .with_options(server_cfg.store_options());

  let seeded = store
    .initialize_catalog()
    .await
    .context("failed to initialise the product catalog")?;
  tracing::info!(created = seeded.len(), "catalog initialised");

  let mut order = server_cfg.order_config();
  order.template_path = expand_tilde(&order.template_path);
  order.output_dir = order.output_dir.as_deref().map(expand_tilde);
  if !order.template_path.exists() {
    tracing::warn!(
      path = %order.template_path.display(),
      "order form template missing; /api/order-form will return 404"
    );
  }

  let app = stock_server::app(AppState::new(store, order));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
