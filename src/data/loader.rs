//! Dataset loading: one fetch from a [`DatasetSource`], no retry, no caching.

use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;

use crate::data::country::CountryRecord;
use crate::data::document::DatasetDocument;
use crate::data::source::DatasetSource;
use crate::data::transform::normalize_country;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset document is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoadError {
    /// True when the payload arrived but did not have the expected shape.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Decode a dataset document and normalize every country in it.
pub fn decode_dataset(bytes: &[u8]) -> Result<Vec<CountryRecord>, LoadError> {
    let document: DatasetDocument = serde_json::from_slice(bytes)?;
    Ok(document
        .countries
        .into_iter()
        .map(normalize_country)
        .collect())
}

/// Fetch the full dataset once. Failures are returned as-is; the caller decides how loudly to log them.
pub async fn load(source: &dyn DatasetSource) -> Result<Vec<CountryRecord>, LoadError> {
    let started = Instant::now();
    match source.fetch().await {
        Ok(countries) => {
            tracing::debug!(
                source = %source.describe(),
                countries = countries.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "dataset loaded"
            );
            Ok(countries)
        }
        Err(err) => {
            tracing::debug!(source = %source.describe(), error = %err, "dataset load failed");
            Err(err)
        }
    }
}
