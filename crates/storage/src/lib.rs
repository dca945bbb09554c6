#![forbid(unsafe_code)]

pub mod catalog;
pub mod preferences;

pub use catalog::{
    BundledCatalog, CatalogLoadError, CatalogSource, CountryRecord, InMemoryCatalog, JsonCatalog,
    bundled_catalog, parse_catalog,
};
pub use preferences::{InMemoryPreferenceStore, PREF_CHOICES, PREF_REGIONS, PreferenceStore};
