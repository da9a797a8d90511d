use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::progress::DEFAULT_TICK;
use crate::source::{ContentSource, DirSource, HttpSource};

/// Base URL or directory holding `demos.json` and the demo folders.
pub const DEMO_ROOT_ENV: &str = "SCREENCODER_DEMO_ROOT";
/// Path of the catalog below the root.
pub const CATALOG_PATH_ENV: &str = "SCREENCODER_CATALOG_PATH";
/// Autoplay tick period in milliseconds.
pub const TICK_MS_ENV: &str = "SCREENCODER_TICK_MS";

pub const DEFAULT_DEMO_ROOT: &str = "./public";
pub const DEFAULT_CATALOG_PATH: &str = "/demos.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid SCREENCODER_DEMO_ROOT URL {value:?}: {reason}")]
    InvalidRoot { value: String, reason: String },
    #[error("invalid SCREENCODER_TICK_MS {0:?}: expected a positive number of milliseconds")]
    InvalidTick(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRoot {
    Http(Url),
    Dir(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub root: ContentRoot,
    pub catalog_path: String,
    pub tick: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root: ContentRoot::Dir(PathBuf::from(DEFAULT_DEMO_ROOT)),
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            tick: DEFAULT_TICK,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(root) = value(DEMO_ROOT_ENV) {
            config.root = parse_root(&root)?;
        }
        if let Some(path) = value(CATALOG_PATH_ENV) {
            config.catalog_path = path;
        }
        if let Some(raw) = value(TICK_MS_ENV) {
            let ms: u64 = raw.parse().map_err(|_| ConfigError::InvalidTick(raw.clone()))?;
            if ms == 0 {
                return Err(ConfigError::InvalidTick(raw));
            }
            config.tick = Duration::from_millis(ms);
        }
        Ok(config)
    }

    pub fn source(&self) -> Arc<dyn ContentSource> {
        match &self.root {
            ContentRoot::Http(url) => Arc::new(HttpSource::new(url.clone())),
            ContentRoot::Dir(dir) => Arc::new(DirSource::new(dir.clone())),
        }
    }
}

fn parse_root(raw: &str) -> Result<ContentRoot, ConfigError> {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        let mut url = Url::parse(raw).map_err(|e| ConfigError::InvalidRoot {
            value: raw.to_string(),
            reason: e.to_string(),
        })?;
        // relative paths resolve against the last directory, so keep a trailing slash
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(ContentRoot::Http(url))
    } else {
        Ok(ContentRoot::Dir(PathBuf::from(raw)))
    }
}
