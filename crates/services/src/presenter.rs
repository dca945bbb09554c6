use quiz_core::model::{Country, RoundSummary};

use crate::error::RenderError;
use crate::quiz::{ChoiceSlots, QuizProgress};

/// Text shown under the flag after a guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Nothing to show (new question).
    Cleared,
    /// Right answer, shown with the country's name.
    Correct { name: String },
    Incorrect,
}

/// Outward rendering interface. The quiz calls it; the UI implements it.
///
/// Only `show_flag` may fail: flag images live outside the engine and a missing
/// one must not stop the quiz.
pub trait QuizPresenter {
    /// # Errors
    ///
    /// Returns `RenderError` if the flag for `country` cannot be displayed.
    fn show_flag(&mut self, country: &Country) -> Result<(), RenderError>;

    fn show_progress(&mut self, progress: &QuizProgress);

    fn show_choices(&mut self, slots: &ChoiceSlots);

    fn show_feedback(&mut self, feedback: &Feedback);

    fn show_summary(&mut self, summary: &RoundSummary);

    /// Settings changed and a new round is starting.
    fn notify_restart(&mut self) {}
}
