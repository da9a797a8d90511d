//! Where catalog, manifest, step and image files come from.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::error::FetchError;

/// Read-only static file host addressed by slash-separated paths.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch a text document (JSON or markup).
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;

    /// Fetch raw bytes (thumbnails).
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}

/// Static files served over HTTP.
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    fn url(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|_| FetchError::NotFound(path.to_string()))
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, FetchError> {
        let url = self.url(path)?;
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        Ok(self.get(path).await?.text().await?)
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        Ok(self.get(path).await?.bytes().await?.to_vec())
    }
}

/// Static files read from a local directory, as a dev server would serve them.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = path.trim_start_matches('/');
        if relative.split('/').any(|segment| segment == "..") {
            return Err(FetchError::NotFound(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ContentSource for DirSource {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let file = self.resolve(path)?;
        debug!(file = %file.display(), "read");
        Ok(tokio::fs::read_to_string(file).await?)
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        Ok(tokio::fs::read(self.resolve(path)?).await?)
    }
}
