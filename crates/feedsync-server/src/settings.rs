//! Server configuration: an optional TOML file overlaid by `FEEDSYNC__*`
//! environment variables.

use std::{
  fmt,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::Deserialize;

pub const ENV_PREFIX: &str = "FEEDSYNC";
pub const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub graph:      GraphConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_owned(),
      port:       8080,
      store_path: PathBuf::from("~/.local/share/feedsync/feeds.db"),
      graph:      GraphConfig::default(),
    }
  }
}

/// Graph API endpoint, app credentials, and the feed request shape.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
  pub base_url:      String,
  pub page_id:       String,
  pub client_id:     String,
  pub client_secret: String,
  pub timeout_secs:  u64,
  pub fields:        String,
  pub limit:         u32,
}

impl Default for GraphConfig {
  fn default() -> Self {
    Self {
      base_url:      "https://graph.facebook.com/v19.0".to_owned(),
      page_id:       "500999826723464".to_owned(),
      client_id:     String::new(),
      client_secret: String::new(),
      timeout_secs:  30,
      fields:        "id,created_time,message,attachments.limit(100){media_type,media,subattachments,type}"
        .to_owned(),
      limit:         100,
    }
  }
}

impl fmt::Debug for GraphConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GraphConfig")
      .field("base_url", &self.base_url)
      .field("page_id", &self.page_id)
      .field("client_id", &self.client_id)
      .field("client_secret", &"<redacted>")
      .field("timeout_secs", &self.timeout_secs)
      .field("fields", &self.fields)
      .field("limit", &self.limit)
      .finish()
  }
}

/// Load `path` (if it exists) and overlay the environment.
pub fn load(path: &Path) -> anyhow::Result<ServerConfig> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
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
