use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CountryError {
    #[error("country name cannot be empty")]
    EmptyName,

    #[error("flag image reference cannot be empty")]
    EmptyImageRef,

    #[error("unknown region: {raw}")]
    UnknownRegion { raw: String },
}

/// Geographic region a country belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Africa,
    Asia,
    Europe,
    NorthAmerica,
    Oceania,
    SouthAmerica,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Africa,
        Region::Asia,
        Region::Europe,
        Region::NorthAmerica,
        Region::Oceania,
        Region::SouthAmerica,
    ];

    /// Display form, with spaces ("North America").
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::NorthAmerica => "North America",
            Region::Oceania => "Oceania",
            Region::SouthAmerica => "South America",
        }
    }

    /// Stored form used by preference stores ("North_America").
    #[must_use]
    pub fn storage_key(self) -> String {
        self.as_str().replace(' ', "_")
    }
}

/// Underscores in stored values stand in for spaces.
#[must_use]
pub fn normalize_region_name(raw: &str) -> String {
    raw.trim().replace('_', " ")
}

impl FromStr for Region {
    type Err = CountryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_region_name(s);
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == normalized)
            .ok_or_else(|| CountryError::UnknownRegion { raw: s.to_string() })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single catalog entry: a country, its region and the flag shown for it.
///
/// Two countries are equal when their names are equal; region and image are
/// not part of identity.
#[derive(Debug, Clone)]
pub struct Country {
    name: String,
    region: Region,
    image_ref: String,
}

impl Country {
    /// Build a validated country.
    ///
    /// # Errors
    ///
    /// Returns `CountryError::EmptyName` or `CountryError::EmptyImageRef` when
    /// the trimmed values are empty.
    pub fn new(
        name: impl Into<String>,
        region: Region,
        image_ref: impl Into<String>,
    ) -> Result<Self, CountryError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CountryError::EmptyName);
        }
        let image_ref = image_ref.into().trim().to_string();
        if image_ref.is_empty() {
            return Err(CountryError::EmptyImageRef);
        }

        Ok(Self {
            name,
            region,
            image_ref,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }

    /// Opaque flag identifier, resolved by whoever renders the flag.
    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }
}

impl PartialEq for Country {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Country {}

impl Hash for Country {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
