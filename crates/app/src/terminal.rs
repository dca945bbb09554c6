use std::io::Write;
use std::path::PathBuf;

use quiz_core::model::{Country, RoundSummary};
use services::{ChoiceSlots, Feedback, QuizPresenter, QuizProgress, RenderError};

/// Renders the quiz as plain text on stdout.
pub struct TerminalPresenter<W: Write> {
    out: W,
    assets_dir: Option<PathBuf>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, assets_dir: Option<PathBuf>) -> Self {
        Self { out, assets_dir }
    }

    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> QuizPresenter for TerminalPresenter<W> {
    fn show_flag(&mut self, country: &Country) -> Result<(), RenderError> {
        if let Some(dir) = &self.assets_dir {
            if !dir.join(country.image_ref()).is_file() {
                return Err(RenderError::MissingImage {
                    image_ref: country.image_ref().to_string(),
                });
            }
        }
        self.line(&format!("[flag: {}]", country.image_ref()));
        Ok(())
    }

    fn show_progress(&mut self, progress: &QuizProgress) {
        self.line(&format!("\n{progress}"));
    }

    fn show_choices(&mut self, slots: &ChoiceSlots) {
        let mut text = String::new();
        for (i, slot) in slots.slots().iter().enumerate() {
            if slot.enabled {
                text.push_str(&format!("  {}) {}\n", i + 1, slot.name));
            } else {
                text.push_str(&format!("  -) {}\n", slot.name));
            }
        }
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();
    }

    fn show_feedback(&mut self, feedback: &Feedback) {
        match feedback {
            Feedback::Cleared => {}
            Feedback::Correct { name } => self.line(&format!("Correct! {name}")),
            Feedback::Incorrect => self.line("Incorrect guess!"),
        }
    }

    fn show_summary(&mut self, summary: &RoundSummary) {
        self.line(&format!(
            "\n{} guesses, {:.02}% correct",
            summary.total_guesses(),
            summary.accuracy_percent()
        ));
        self.line("Press Enter to play again, or :quit.");
    }

    fn notify_restart(&mut self) {
        self.line("Quiz will restart with your new settings");
    }
}
