/// Number of flags asked in one round.
pub const FLAGS_IN_QUIZ: u32 = 10;

/// Whether a guess ends the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundSignal {
    Continue,
    RoundComplete,
}

/// Result of a single guess as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct(RoundSignal),
    Incorrect,
}

impl GuessOutcome {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, GuessOutcome::Correct(_))
    }

    #[must_use]
    pub fn completes_round(self) -> bool {
        matches!(self, GuessOutcome::Correct(RoundSignal::RoundComplete))
    }
}

/// Counters after applying one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedOutcome {
    pub total_guesses: u32,
    pub correct_guesses: u32,
    pub signal: RoundSignal,
}

impl TrackedOutcome {
    /// Caller-facing view of this step; `is_match` picks the variant.
    #[must_use]
    pub fn guess_outcome(&self, is_match: bool) -> GuessOutcome {
        if is_match {
            GuessOutcome::Correct(self.signal)
        } else {
            GuessOutcome::Incorrect
        }
    }
}

/// Apply one guess to the round counters.
///
/// `RoundComplete` fires only on a matching guess that brings the correct
/// count to `FLAGS_IN_QUIZ`.
#[must_use]
pub fn outcome_for(total_guesses: u32, correct_guesses: u32, is_match: bool) -> TrackedOutcome {
    let total_guesses = total_guesses.saturating_add(1);
    let correct_guesses = if is_match {
        correct_guesses.saturating_add(1)
    } else {
        correct_guesses
    };
    let signal = if is_match && correct_guesses == FLAGS_IN_QUIZ {
        RoundSignal::RoundComplete
    } else {
        RoundSignal::Continue
    };

    TrackedOutcome {
        total_guesses,
        correct_guesses,
        signal,
    }
}

/// Share of correct guesses as a percentage; `0.0` before any guess.
#[must_use]
pub fn accuracy_percent(total_guesses: u32, correct_guesses: u32) -> f64 {
    if total_guesses == 0 {
        return 0.0;
    }
    f64::from(correct_guesses) / f64::from(total_guesses) * 100.0
}
