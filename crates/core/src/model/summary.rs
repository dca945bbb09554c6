use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::config::RegionFilter;
use crate::model::outcome::accuracy_percent;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct guesses ({correct}) exceed total guesses ({total})")]
    CountMismatch { total: u32, correct: u32 },
}

/// Totals for a finished round, shown to the player at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    region: RegionFilter,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total_guesses: u32,
    correct_guesses: u32,
}

impl RoundSummary {
    /// # Errors
    ///
    /// Returns `RoundSummaryError` if the time range is inverted or the counts
    /// are inconsistent.
    pub fn new(
        region: RegionFilter,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total_guesses: u32,
        correct_guesses: u32,
    ) -> Result<Self, RoundSummaryError> {
        if completed_at < started_at {
            return Err(RoundSummaryError::InvalidTimeRange);
        }
        if correct_guesses > total_guesses {
            return Err(RoundSummaryError::CountMismatch {
                total: total_guesses,
                correct: correct_guesses,
            });
        }

        Ok(Self {
            region,
            started_at,
            completed_at,
            total_guesses,
            correct_guesses,
        })
    }

    #[must_use]
    pub fn region(&self) -> RegionFilter {
        self.region
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total_guesses(&self) -> u32 {
        self.total_guesses
    }

    #[must_use]
    pub fn correct_guesses(&self) -> u32 {
        self.correct_guesses
    }

    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        accuracy_percent(self.total_guesses, self.correct_guesses)
    }
}
