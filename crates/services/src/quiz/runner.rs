use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use quiz_core::model::{GuessOutcome, QuizConfiguration};
use storage::PreferenceStore;

use super::progress::QuizProgress;
use super::session::AdvanceTicket;
use super::workflow::QuizLoopService;
use crate::advance::AdvanceScheduler;
use crate::error::QuizError;
use crate::presenter::QuizPresenter;

/// Couples a `QuizLoopService` with the delayed advance after correct answers.
///
/// Any restart cancels the pending advance; tickets that still slip through
/// are rejected by the session as stale.
pub struct QuizRunner {
    quiz: QuizLoopService,
    scheduler: AdvanceScheduler,
    advances: mpsc::UnboundedReceiver<AdvanceTicket>,
}

impl QuizRunner {
    #[must_use]
    pub fn new(quiz: QuizLoopService, delay: Duration) -> Self {
        let (scheduler, advances) = AdvanceScheduler::new(delay);
        Self {
            quiz,
            scheduler,
            advances,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizLoopService {
        &self.quiz
    }

    #[must_use]
    pub fn is_advance_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// # Errors
    ///
    /// See `QuizLoopService::restart`.
    pub fn restart<P: QuizPresenter + ?Sized>(
        &mut self,
        presenter: &mut P,
    ) -> Result<QuizProgress, QuizError> {
        self.scheduler.cancel();
        self.quiz.restart(presenter)
    }

    /// # Errors
    ///
    /// See `QuizLoopService::apply_configuration`.
    pub fn apply_configuration<P: QuizPresenter + ?Sized>(
        &mut self,
        config: QuizConfiguration,
        presenter: &mut P,
    ) -> Result<bool, QuizError> {
        let applied = self.quiz.apply_configuration(config, presenter)?;
        if applied {
            self.scheduler.cancel();
        }
        Ok(applied)
    }

    /// # Errors
    ///
    /// See `QuizLoopService::apply_preferences`.
    pub fn apply_preferences<P: QuizPresenter + ?Sized>(
        &mut self,
        store: &dyn PreferenceStore,
        presenter: &mut P,
    ) -> Result<bool, QuizError> {
        let applied = self.quiz.apply_preferences(store, presenter)?;
        if applied {
            self.scheduler.cancel();
        }
        Ok(applied)
    }

    /// Record a guess; a correct, non-final one schedules the next question.
    ///
    /// # Errors
    ///
    /// See `QuizLoopService::guess`.
    pub fn guess<P: QuizPresenter + ?Sized>(
        &mut self,
        name: &str,
        presenter: &mut P,
    ) -> Result<GuessOutcome, QuizError> {
        let outcome = self.quiz.guess(name, presenter)?;
        if let Some(ticket) = self.quiz.pending_advance() {
            self.scheduler.schedule(ticket);
        }
        Ok(outcome)
    }

    /// Wait for the next scheduled advance to fire.
    ///
    /// Cancel-safe; never resolves while nothing is scheduled.
    pub async fn next_advance(&mut self) -> Option<AdvanceTicket> {
        self.advances.recv().await
    }

    /// Apply a fired advance. Stale tickets are dropped and yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates errors other than `QuizError::StaleAdvance`.
    pub fn advance<P: QuizPresenter + ?Sized>(
        &mut self,
        ticket: AdvanceTicket,
        presenter: &mut P,
    ) -> Result<Option<QuizProgress>, QuizError> {
        match self.quiz.advance(ticket, presenter) {
            Ok(progress) => Ok(Some(progress)),
            Err(QuizError::StaleAdvance) => {
                debug!(round = ticket.round(), "dropped stale advance");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
