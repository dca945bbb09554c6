use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::index;
use tracing::{debug, error, info, warn};

use quiz_core::Clock;
use quiz_core::model::{
    Catalog, Country, FLAGS_IN_QUIZ, GuessOutcome, QuizConfiguration, RoundSignal, RoundSummary,
    accuracy_percent, outcome_for,
};

use super::progress::QuizProgress;
use crate::error::QuizError;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    /// Never reset.
    Idle,
    Active,
    /// Tenth correct guess made; only a reset leaves this state.
    Complete,
}

/// Permission to move past a correctly answered question.
///
/// Issued by `QuizSession::pending_advance` and only honoured while the
/// session is still on the same round and question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    round: u64,
    asked: u32,
}

impl AdvanceTicket {
    #[must_use]
    pub fn round(&self) -> u64 {
        self.round
    }

    #[must_use]
    pub fn asked(&self) -> u32 {
        self.asked
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One flag-quiz round: a queue of ten distinct countries and the guess counters.
///
/// The session is synchronous and owns no timers; delayed advancing is left to
/// the caller (see `AdvanceScheduler`).
pub struct QuizSession {
    clock: Clock,
    state: QuizState,
    round: u64,
    config: QuizConfiguration,
    queue: VecDeque<Country>,
    current: Option<Country>,
    awaiting_guess: bool,
    total_guesses: u32,
    correct_guesses: u32,
    started_at: Option<DateTime<Utc>>,
    summary: Option<RoundSummary>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Clock::default(),
            state: QuizState::Idle,
            round: 0,
            config: QuizConfiguration::default(),
            queue: VecDeque::with_capacity(FLAGS_IN_QUIZ as usize),
            current: None,
            awaiting_guess: false,
            total_guesses: 0,
            correct_guesses: 0,
            started_at: None,
            summary: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Start a fresh round: clear counters and draw ten distinct countries
    /// matching the configured region.
    ///
    /// On error the session is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientCatalog` if fewer than ten distinct
    /// countries match the region filter.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        catalog: &Catalog,
        config: QuizConfiguration,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        let required = FLAGS_IN_QUIZ as usize;
        let eligible = catalog.eligible(&config.region());
        if eligible.len() < required {
            return Err(QuizError::InsufficientCatalog {
                required,
                available: eligible.len(),
            });
        }

        self.queue.clear();
        self.queue.extend(
            index::sample(rng, eligible.len(), required)
                .into_iter()
                .map(|i| eligible[i].clone()),
        );
        self.round += 1;
        self.state = QuizState::Active;
        self.config = config;
        self.current = None;
        self.awaiting_guess = false;
        self.total_guesses = 0;
        self.correct_guesses = 0;
        self.started_at = Some(self.clock.now());
        self.summary = None;

        info!(
            round = self.round,
            region = %config.region(),
            choices = config.num_choices(),
            pool = eligible.len(),
            "quiz reset"
        );
        Ok(())
    }

    /// Take the next country off the queue and make it the question.
    ///
    /// Returns the country and how many questions remain after it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Exhausted` if the queue is empty.
    pub fn load_next(&mut self) -> Result<(Country, usize), QuizError> {
        let Some(country) = self.queue.pop_front() else {
            error!(round = self.round, state = ?self.state, "load_next called with no questions left");
            return Err(QuizError::Exhausted);
        };

        self.current = Some(country.clone());
        self.awaiting_guess = true;
        debug!(
            round = self.round,
            question = self.asked(),
            remaining = self.queue.len(),
            "question loaded"
        );
        Ok((country, self.queue.len()))
    }

    /// Record a guess against the current question.
    ///
    /// A correct guess closes the question; further guesses fail until the
    /// next one is loaded.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` after the round has finished and
    /// `QuizError::NoQuestionLoaded` if no question is open.
    pub fn record_guess(&mut self, guessed: &str) -> Result<GuessOutcome, QuizError> {
        if self.state == QuizState::Complete {
            return Err(QuizError::Completed);
        }
        let Some(current) = self.current.as_ref().filter(|_| self.awaiting_guess) else {
            error!(round = self.round, guessed, "guess recorded with no open question");
            return Err(QuizError::NoQuestionLoaded);
        };

        let is_match = guessed == current.name();
        let step = outcome_for(self.total_guesses, self.correct_guesses, is_match);
        let summary = if step.signal == RoundSignal::RoundComplete {
            Some(self.summarize(step.total_guesses, step.correct_guesses)?)
        } else {
            None
        };

        self.total_guesses = step.total_guesses;
        self.correct_guesses = step.correct_guesses;
        if is_match {
            self.awaiting_guess = false;
        }
        if let Some(summary) = summary {
            self.summary = Some(summary);
            self.state = QuizState::Complete;
            info!(
                round = self.round,
                total = self.total_guesses,
                accuracy = self.accuracy_percent(),
                "round complete"
            );
        }

        debug!(round = self.round, is_match, total = self.total_guesses, "guess recorded");
        Ok(step.guess_outcome(is_match))
    }

    /// Completion time never precedes the start, even if the wall clock
    /// stepped backwards during the round.
    fn summarize(&self, total: u32, correct: u32) -> Result<RoundSummary, QuizError> {
        let now = self.clock.now();
        let started_at = self.started_at.unwrap_or(now);
        if now < started_at {
            warn!(round = self.round, %started_at, %now, "clock went backwards during round");
        }
        let completed_at = now.max(started_at);
        Ok(RoundSummary::new(
            self.config.region(),
            started_at,
            completed_at,
            total,
            correct,
        )?)
    }

    /// Ticket for moving on, present only after a correct guess with
    /// questions still queued.
    #[must_use]
    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        let ready = self.state == QuizState::Active
            && self.current.is_some()
            && !self.awaiting_guess
            && !self.queue.is_empty();
        ready.then_some(AdvanceTicket {
            round: self.round,
            asked: self.asked(),
        })
    }

    /// Load the next question if `ticket` still matches this round and question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::StaleAdvance` for a ticket from an earlier round or
    /// question.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> Result<(Country, usize), QuizError> {
        if self.pending_advance() != Some(ticket) {
            debug!(
                round = self.round,
                ticket_round = ticket.round,
                ticket_asked = ticket.asked,
                "ignoring stale advance"
            );
            return Err(QuizError::StaleAdvance);
        }
        self.load_next()
    }

    /// Correct guesses as a percentage of all guesses; `0.0` before any guess.
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        accuracy_percent(self.total_guesses, self.correct_guesses)
    }

    #[must_use]
    pub fn state(&self) -> QuizState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == QuizState::Complete
    }

    /// Incremented by every successful reset.
    #[must_use]
    pub fn round(&self) -> u64 {
        self.round
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfiguration {
        &self.config
    }

    #[must_use]
    pub fn current(&self) -> Option<&Country> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_awaiting_guess(&self) -> bool {
        self.awaiting_guess
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Questions drawn from the queue so far this round.
    #[must_use]
    pub fn asked(&self) -> u32 {
        if self.state == QuizState::Idle {
            return 0;
        }
        let remaining = u32::try_from(self.queue.len()).unwrap_or(FLAGS_IN_QUIZ);
        FLAGS_IN_QUIZ.saturating_sub(remaining)
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
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            question_number: self.asked(),
            total: FLAGS_IN_QUIZ,
            remaining: self.queue.len(),
            correct_guesses: self.correct_guesses,
            total_guesses: self.total_guesses,
            is_complete: self.is_complete(),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("state", &self.state)
            .field("round", &self.round)
            .field("queue_len", &self.queue.len())
            .field("current", &self.current.as_ref().map(Country::name))
            .field("total_guesses", &self.total_guesses)
            .field("correct_guesses", &self.correct_guesses)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
