//! Template sources
//!
//! Templates are immutable, fetched once per form per request and never
//! cached. Production reads them from the static template host; a local
//! directory or an in-memory map can stand in for it.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Which family of templates a form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSet {
    Guardianship,
    Conservatorship,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template {0} not found")]
    NotFound(String),
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Raw bytes of the template file `name`
    async fn fetch(&self, set: TemplateSet, name: &str) -> Result<Vec<u8>, StoreError>;
}

/// Templates served over HTTP, one base URL per template set
pub struct HttpTemplateStore {
    client: reqwest::Client,
    guardianship_url: String,
    conservatorship_url: String,
}

impl HttpTemplateStore {
    pub fn new(guardianship_url: impl Into<String>, conservatorship_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            guardianship_url: guardianship_url.into(),
            conservatorship_url: conservatorship_url.into(),
        }
    }

    fn url(&self, set: TemplateSet, name: &str) -> String {
        let base = match set {
            TemplateSet::Guardianship => &self.guardianship_url,
            TemplateSet::Conservatorship => &self.conservatorship_url,
        };
        format!("{}/{}", base.trim_end_matches('/'), name)
    }
}

#[async_trait]
impl TemplateStore for HttpTemplateStore {
    async fn fetch(&self, set: TemplateSet, name: &str) -> Result<Vec<u8>, StoreError> {
        let url = self.url(set, name);
        debug!("Fetching template {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| StoreError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| StoreError::Request { url, source })?;
        Ok(bytes.to_vec())
    }
}

/// Templates read from a local directory
///
/// Both template sets share the directory; their file names do not overlap.
pub struct DirTemplateStore {
    root: PathBuf,
}

impl DirTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TemplateStore for DirTemplateStore {
    async fn fetch(&self, _set: TemplateSet, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.root.join(name);
        debug!("Reading template {}", path.display());
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

/// Templates held in memory, keyed by file name
#[derive(Default)]
pub struct MemoryTemplateStore {
    templates: HashMap<String, Vec<u8>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.templates.insert(name.to_string(), bytes);
        self
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn fetch(&self, _set: TemplateSet, name: &str) -> Result<Vec<u8>, StoreError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
