mod catalog;
mod config;
mod country;
mod outcome;
mod summary;

pub use catalog::Catalog;
pub use config::{
    DEFAULT_CHOICES, MAX_CHOICES, MIN_CHOICES, QuizConfigDraft, QuizConfigError,
    QuizConfiguration, RegionFilter,
};
pub use country::{Country, CountryError, Region, normalize_region_name};
pub use outcome::{
    FLAGS_IN_QUIZ, GuessOutcome, RoundSignal, TrackedOutcome, accuracy_percent, outcome_for,
};
pub use summary::{RoundSummary, RoundSummaryError};
