//! Where the dataset document comes from. Production reads the published JSON
//! over HTTPS; tests and offline runs bind a local file or an in-memory copy.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::data::country::CountryRecord;
use crate::data::loader::{decode_dataset, LoadError};

pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/kubra-kzlk/holidayplanner/main/dataset.json";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch and decode the whole dataset. Each call goes back to the source.
    async fn fetch(&self) -> Result<Vec<CountryRecord>, LoadError>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

pub struct HttpDatasetSource {
    url: String,
    client: reqwest::Client,
}

impl HttpDatasetSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LoadError::Fetch {
                url: url.clone(),
                source,
            })?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self) -> Result<Vec<CountryRecord>, LoadError> {
        let fetch_error = |source| LoadError::Fetch {
            url: self.url.clone(),
            source,
        };
        let response = self.client.get(&self.url).send().await.map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(fetch_error)?;
        decode_dataset(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the document from disk on every fetch.
pub struct FileDatasetSource {
    path: PathBuf,
}

impl FileDatasetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileDatasetSource {
    async fn fetch(&self) -> Result<Vec<CountryRecord>, LoadError> {
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Read {
                path: self.path.clone(),
                source,
            })?;
        decode_dataset(&body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves a fixed copy of the dataset.
#[derive(Debug, Clone, Default)]
pub struct StaticDatasetSource {
    countries: Vec<CountryRecord>,
}

impl StaticDatasetSource {
    pub fn new(countries: Vec<CountryRecord>) -> Self {
        Self { countries }
    }

    /// Decode a document up front, so a malformed fixture fails at construction.
    pub fn from_json(document: &str) -> Result<Self, LoadError> {
        decode_dataset(document.as_bytes()).map(Self::new)
    }
}

#[async_trait]
impl DatasetSource for StaticDatasetSource {
    async fn fetch(&self) -> Result<Vec<CountryRecord>, LoadError> {
        Ok(self.countries.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory dataset ({} countries)", self.countries.len())
    }
}
