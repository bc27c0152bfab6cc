//! Sources of the engine script text
//!
//! - `EmbeddedScriptProvider`: a script compiled into the binary
//! - `FileScriptProvider`: a script on the local filesystem
//! - `ExternalScriptProvider`: a script downloaded from a URL, through a shared cache

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use axescan_common::{Error, Result};

/// Supplies the engine script to inject
#[async_trait]
pub trait ScriptProvider: Send + Sync {
    async fn script(&self) -> Result<String>;
}

/// Script text compiled into the caller's binary
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedScriptProvider {
    script: &'static str,
}

impl EmbeddedScriptProvider {
    pub fn new(script: &'static str) -> Self {
        Self { script }
    }
}

#[async_trait]
impl ScriptProvider for EmbeddedScriptProvider {
    async fn script(&self) -> Result<String> {
        Ok(self.script.to_string())
    }
}

/// Script read from a local file on every call
#[derive(Debug, Clone)]
pub struct FileScriptProvider {
    path: PathBuf,
}

impl FileScriptProvider {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("script path is empty".to_string()));
        }
        if !path.exists() {
            return Err(Error::InvalidArgument(format!(
                "script file does not exist: {}",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

#[async_trait]
impl ScriptProvider for FileScriptProvider {
    async fn script(&self) -> Result<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(script) => Ok(script),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::InvalidOperation(
                format!("script file '{}' does not exist", self.path.display()),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

/// Fetches the text behind a URL
#[async_trait]
pub trait ContentDownloader: Send + Sync {
    async fn content(&self, url: &Url) -> Result<String>;
}

/// Downloader backed by an HTTP client
#[derive(Debug, Clone)]
pub struct HttpContentDownloader {
    client: reqwest::Client,
}

impl HttpContentDownloader {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Download(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentDownloader for HttpContentDownloader {
    async fn content(&self, url: &Url) -> Result<String> {
        info!("Downloading engine script from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Download(format!("{}: {}", url, e)))?;

        response
            .text()
            .await
            .map_err(|e| Error::Download(format!("{}: {}", url, e)))
    }
}

/// Downloaded content keyed by URL.
///
/// Shared between sessions through an `Arc`; its lifetime is whatever the owner
/// gives it (the process, or a single test). Each key is populated at most once:
/// concurrent callers for the same URL wait on one fetch and see one value.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: DashMap<String, Arc<OnceCell<String>>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &Url) -> Option<String> {
        self.entries
            .get(&cache_key(url))
            .and_then(|cell| cell.get().cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value().initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached value for `url`, fetching it with `downloader` if absent.
    ///
    /// A failed or empty fetch leaves the key unpopulated so a later call retries.
    pub async fn get_or_fetch(
        &self,
        url: &Url,
        downloader: &dyn ContentDownloader,
    ) -> Result<String> {
        let key = cache_key(url);
        // Clone the cell out so no map shard lock is held across the await.
        let cell = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .value()
            .clone();

        let fetched = cell
            .get_or_try_init(|| async {
                let content = downloader.content(url).await?;
                if content.is_empty() {
                    return Err(Error::Download(format!("{} returned no content", url)));
                }
                debug!("Cached {} bytes for {}", content.len(), url);
                Ok(content)
            })
            .await;

        match fetched {
            Ok(content) => Ok(content.clone()),
            Err(e) => {
                // Drop the empty slot so failing URLs do not accumulate.
                self.entries.remove_if(&key, |_, c| !c.initialized());
                Err(e)
            }
        }
    }

    /// Number of keys tracked, including ones with a fetch in flight
    #[cfg(test)]
    fn slots(&self) -> usize {
        self.entries.len()
    }
}

fn cache_key(url: &Url) -> String {
    url.as_str().to_ascii_lowercase()
}

/// Downloader decorated with a shared cache
pub struct CachedContentDownloader {
    inner: Arc<dyn ContentDownloader>,
    cache: Arc<ContentCache>,
}

impl CachedContentDownloader {
    pub fn new(inner: Arc<dyn ContentDownloader>, cache: Arc<ContentCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl ContentDownloader for CachedContentDownloader {
    async fn content(&self, url: &Url) -> Result<String> {
        self.cache.get_or_fetch(url, self.inner.as_ref()).await
    }
}

/// Script downloaded from a URL
pub struct ExternalScriptProvider {
    url: Url,
    downloader: Arc<dyn ContentDownloader>,
}

impl ExternalScriptProvider {
    pub fn new(url: &str, downloader: Arc<dyn ContentDownloader>) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::InvalidArgument(format!("script url '{}': {}", url, e)))?;
        Ok(Self { url, downloader })
    }

    /// Download over HTTP through `cache`
    pub fn cached(url: &str, cache: Arc<ContentCache>) -> Result<Self> {
        let http: Arc<dyn ContentDownloader> = Arc::new(HttpContentDownloader::new()?);
        Self::new(url, Arc::new(CachedContentDownloader::new(http, cache)))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ScriptProvider for ExternalScriptProvider {
    async fn script(&self) -> Result<String> {
        self.downloader.content(&self.url).await
    }
}
