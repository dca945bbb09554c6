use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::{Catalog, Country, CountryError, Region};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const BUNDLED_CATALOG: &str = include_str!("../assets/countries.json");

/// Errors surfaced while loading a country catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogLoadError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("catalog contains no countries")]
    Empty,

    #[error("invalid catalog entry #{index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: CountryError,
    },
}

/// Persisted shape for a country, as found in catalog documents.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub region: String,
    #[serde(alias = "file_name", alias = "fileName")]
    pub image: String,
}

impl CountryRecord {
    /// Convert the record into a domain `Country`.
    ///
    /// # Errors
    ///
    /// Returns `CountryError` for an unknown region or empty fields.
    pub fn into_country(self) -> Result<Country, CountryError> {
        let region: Region = self.region.parse()?;
        Country::new(self.name, region, self.image)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    countries: Vec<CountryRecord>,
}

/// Parse a JSON catalog document.
///
/// Any bad entry fails the whole document; no partial catalogs are returned.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the JSON is malformed, empty, or has an
/// invalid entry.
pub fn parse_catalog(json: &str) -> Result<Catalog, CatalogLoadError> {
    let document: CatalogDocument = serde_json::from_str(json)?;
    if document.countries.is_empty() {
        return Err(CatalogLoadError::Empty);
    }

    let mut seen = HashSet::new();
    let mut countries = Vec::with_capacity(document.countries.len());
    for (index, record) in document.countries.into_iter().enumerate() {
        let country = record
            .into_country()
            .map_err(|source| CatalogLoadError::InvalidEntry { index, source })?;
        if !seen.insert(country.name().to_string()) {
            warn!(name = country.name(), index, "duplicate country name in catalog");
        }
        countries.push(country);
    }

    debug!(count = countries.len(), "parsed country catalog");
    Ok(Catalog::new(countries))
}

/// The catalog shipped with the crate.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the bundled document is invalid.
pub fn bundled_catalog() -> Result<Catalog, CatalogLoadError> {
    parse_catalog(BUNDLED_CATALOG)
}

/// Anything that can produce the country list for a quiz.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError` if the catalog cannot be read or parsed.
    async fn load_catalog(&self) -> Result<Catalog, CatalogLoadError>;
}

/// Catalog read from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonCatalog {
    async fn load_catalog(&self) -> Result<Catalog, CatalogLoadError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogLoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_catalog(&json)
    }
}

/// The catalog bundled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

#[async_trait]
impl CatalogSource for BundledCatalog {
    async fn load_catalog(&self) -> Result<Catalog, CatalogLoadError> {
        bundled_catalog()
    }
}

/// Simple in-memory source for tests and prototyping.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    countries: Vec<Country>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn load_catalog(&self) -> Result<Catalog, CatalogLoadError> {
        if self.countries.is_empty() {
            return Err(CatalogLoadError::Empty);
        }
        Ok(Catalog::new(self.countries.clone()))
    }
}
