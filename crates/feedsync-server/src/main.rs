//! feedsync server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), overlays
//! `FEEDSYNC__*` environment variables, opens the SQLite store, and serves
//! the feed API over HTTP.

mod settings;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use feedsync_api::{AppState, Credentials, FeedSettings};
use feedsync_graph::GraphClient;
use feedsync_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Facebook page feed mirror")]
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
  let server_cfg = settings::load(&cli.config)?;
  tracing::debug!(?server_cfg, "configuration loaded");

  let graph_cfg = &server_cfg.graph;
  if graph_cfg.client_id.is_empty() || graph_cfg.client_secret.is_empty() {
    tracing::warn!("graph client credentials are not configured; token exchange will fail");
  }

  // Open SQLite store.
  let store_path = settings::expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let graph = GraphClient::new(
    graph_cfg.base_url.clone(),
    graph_cfg.page_id.clone(),
    Duration::from_secs(graph_cfg.timeout_secs),
  )
  .context("failed to build graph api client")?;

  // Build application state.
  let state = AppState::new(
    Arc::new(store),
    Arc::new(graph),
    Credentials {
      client_id:     graph_cfg.client_id.clone(),
      client_secret: graph_cfg.client_secret.clone(),
    },
    FeedSettings {
      fields: graph_cfg.fields.clone(),
      limit:  graph_cfg.limit,
    },
  );

  let app = feedsync_api::api_router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
