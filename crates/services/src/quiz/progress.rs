use std::fmt;

/// Where the player is in the current round, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// 1-based number of the question on screen; 0 before the first one.
    pub question_number: u32,
    pub total: u32,
    pub remaining: usize,
    pub correct_guesses: u32,
    pub total_guesses: u32,
    pub is_complete: bool,
}

impl fmt::Display for QuizProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Question {} of {}", self.question_number, self.total)
    }
}
