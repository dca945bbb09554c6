use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::country::{CountryError, Region, normalize_region_name};

/// Fewest answer buttons a question may show.
pub const MIN_CHOICES: u8 = 2;
/// Most answer buttons a question may show.
pub const MAX_CHOICES: u8 = 8;
pub const DEFAULT_CHOICES: u8 = 4;

const ALL_REGIONS: &str = "All";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizConfigError {
    #[error("number of choices must be between 2 and 8, got {value}")]
    ChoicesOutOfRange { value: i64 },

    #[error("number of choices is not an integer: {raw}")]
    InvalidChoices { raw: String },

    #[error(transparent)]
    Region(#[from] CountryError),
}

/// Restricts which countries may be asked about. Decoys are never filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegionFilter {
    #[default]
    All,
    Only(Region),
}

impl RegionFilter {
    #[must_use]
    pub fn matches(&self, region: Region) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(only) => *only == region,
        }
    }

    /// Stored form, e.g. `All` or `North_America`.
    #[must_use]
    pub fn storage_key(&self) -> String {
        match self {
            RegionFilter::All => ALL_REGIONS.to_string(),
            RegionFilter::Only(region) => region.storage_key(),
        }
    }
}

impl FromStr for RegionFilter {
    type Err = CountryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if normalize_region_name(s) == ALL_REGIONS {
            return Ok(RegionFilter::All);
        }
        s.parse().map(RegionFilter::Only)
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => f.write_str(ALL_REGIONS),
            RegionFilter::Only(region) => fmt::Display::fmt(region, f),
        }
    }
}

/// Active quiz settings: how many answer buttons, and which region to ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfiguration {
    num_choices: u8,
    region: RegionFilter,
}

impl QuizConfiguration {
    /// # Errors
    ///
    /// Returns `QuizConfigError::ChoicesOutOfRange` if `num_choices` is outside
    /// `MIN_CHOICES..=MAX_CHOICES`.
    pub fn new(num_choices: u8, region: RegionFilter) -> Result<Self, QuizConfigError> {
        if !(MIN_CHOICES..=MAX_CHOICES).contains(&num_choices) {
            return Err(QuizConfigError::ChoicesOutOfRange {
                value: i64::from(num_choices),
            });
        }
        Ok(Self {
            num_choices,
            region,
        })
    }

    #[must_use]
    pub fn num_choices(&self) -> u8 {
        self.num_choices
    }

    #[must_use]
    pub fn region(&self) -> RegionFilter {
        self.region
    }

    #[must_use]
    pub fn with_region(mut self, region: RegionFilter) -> Self {
        self.region = region;
        self
    }
}

impl Default for QuizConfiguration {
    fn default() -> Self {
        Self {
            num_choices: DEFAULT_CHOICES,
            region: RegionFilter::All,
        }
    }
}

/// Raw preference values as kept by a settings store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizConfigDraft {
    pub region: Option<String>,
    pub num_choices: Option<String>,
}

impl QuizConfigDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into an active configuration.
    ///
    /// Missing or blank values fall back to defaults (`All`, 4 choices).
    ///
    /// # Errors
    ///
    /// Returns `QuizConfigError` if the region is unknown or the choice count
    /// is not an integer in range.
    pub fn validate(self) -> Result<QuizConfiguration, QuizConfigError> {
        let region = match normalize_optional(self.region) {
            Some(raw) => raw.parse::<RegionFilter>()?,
            None => RegionFilter::All,
        };

        let num_choices = match normalize_optional(self.num_choices) {
            Some(raw) => {
                let value: i64 = raw
                    .parse()
                    .map_err(|_| QuizConfigError::InvalidChoices { raw: raw.clone() })?;
                u8::try_from(value).map_err(|_| QuizConfigError::ChoicesOutOfRange { value })?
            }
            None => DEFAULT_CHOICES,
        };

        QuizConfiguration::new(num_choices, region)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
