use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use quiz_core::Clock;
use quiz_core::model::{Catalog, Country, GuessOutcome, QuizConfiguration};
use storage::PreferenceStore;

use super::choices::{ChoiceGenerator, ChoiceSlots};
use super::progress::QuizProgress;
use super::session::{AdvanceTicket, QuizSession, QuizState};
use crate::error::QuizError;
use crate::presenter::{Feedback, QuizPresenter};

/// Runs quiz rounds against a catalog and pushes every state change to a
/// presenter.
///
/// Synchronous: the delay before the next question belongs to the caller,
/// which polls `pending_advance` and calls `advance` when it fires.
pub struct QuizLoopService {
    catalog: Catalog,
    config: QuizConfiguration,
    session: QuizSession,
    slots: ChoiceSlots,
    rng: StdRng,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(catalog: Catalog, config: QuizConfiguration) -> Self {
        Self {
            catalog,
            config,
            session: QuizSession::new(),
            slots: ChoiceSlots::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.session = self.session.with_clock(clock);
        self
    }

    /// Use a deterministic generator.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Start a new round with the active configuration and show its first
    /// question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientCatalog` if the catalog cannot fill a
    /// round or the configured number of choices.
    pub fn restart<P: QuizPresenter + ?Sized>(
        &mut self,
        presenter: &mut P,
    ) -> Result<QuizProgress, QuizError> {
        ChoiceGenerator::new(&self.catalog).ensure_capacity(self.config.num_choices())?;
        self.session.reset(&self.catalog, self.config, &mut self.rng)?;
        let (country, _) = self.session.load_next()?;
        self.present_question(&country, presenter)
    }

    /// Switch to `config` and start over.
    ///
    /// Returns `false` without touching the round when `config` is already
    /// active and a round has been started. If the new configuration cannot
    /// start a round, the previous one stays active.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientCatalog` if the catalog cannot satisfy
    /// `config`.
    pub fn apply_configuration<P: QuizPresenter + ?Sized>(
        &mut self,
        config: QuizConfiguration,
        presenter: &mut P,
    ) -> Result<bool, QuizError> {
        if config == self.config && self.session.state() != QuizState::Idle {
            return Ok(false);
        }

        let previous = std::mem::replace(&mut self.config, config);
        if let Err(err) = self.restart(presenter) {
            warn!(error = %err, region = %config.region(), "configuration rejected");
            self.config = previous;
            return Err(err);
        }

        info!(
            region = %config.region(),
            choices = config.num_choices(),
            "configuration applied"
        );
        presenter.notify_restart();
        Ok(true)
    }

    /// Read raw preferences from `store` and apply them.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Config` for invalid stored values, or any error
    /// from `apply_configuration`.
    pub fn apply_preferences<P: QuizPresenter + ?Sized>(
        &mut self,
        store: &dyn PreferenceStore,
        presenter: &mut P,
    ) -> Result<bool, QuizError> {
        let config = store.quiz_draft().validate()?;
        self.apply_configuration(config, presenter)
    }

    /// Record a guess and update the slots, feedback and (at the end) summary.
    ///
    /// `name` is matched against the enabled slots ignoring case; a choice
    /// already ruled out, or one not on the board, is not counted.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotAChoice` for a name without an enabled slot, and
    /// propagates `QuizSession::record_guess` errors.
    pub fn guess<P: QuizPresenter + ?Sized>(
        &mut self,
        name: &str,
        presenter: &mut P,
    ) -> Result<GuessOutcome, QuizError> {
        let chosen = if self.session.is_awaiting_guess() {
            match self.slots.find_enabled(name) {
                Some(slot) => slot.name.clone(),
                None => {
                    debug!(guessed = name, "guess is not an available choice");
                    return Err(QuizError::NotAChoice {
                        name: name.trim().to_string(),
                    });
                }
            }
        } else {
            name.to_string()
        };
        let outcome = self.session.record_guess(&chosen)?;

        match outcome {
            GuessOutcome::Correct(_) => {
                self.slots.disable_all();
                presenter.show_choices(&self.slots);
                let name = self
                    .session
                    .current()
                    .map(|country| country.name().to_string())
                    .unwrap_or_default();
                presenter.show_feedback(&Feedback::Correct { name });
                presenter.show_progress(&self.session.progress());
                if let Some(summary) = self.session.summary() {
                    presenter.show_summary(summary);
                }
            }
            GuessOutcome::Incorrect => {
                self.slots.disable(&chosen);
                presenter.show_choices(&self.slots);
                presenter.show_feedback(&Feedback::Incorrect);
            }
        }

        Ok(outcome)
    }

    /// Ticket for the delayed move to the next question, if one is due.
    #[must_use]
    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        self.session.pending_advance()
    }

    /// Show the next question if `ticket` is still current.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::StaleAdvance` for a ticket from an earlier round or
    /// question.
    pub fn advance<P: QuizPresenter + ?Sized>(
        &mut self,
        ticket: AdvanceTicket,
        presenter: &mut P,
    ) -> Result<QuizProgress, QuizError> {
        let (country, _) = self.session.advance(ticket)?;
        self.present_question(&country, presenter)
    }

    fn present_question<P: QuizPresenter + ?Sized>(
        &mut self,
        country: &Country,
        presenter: &mut P,
    ) -> Result<QuizProgress, QuizError> {
        let names = ChoiceGenerator::new(&self.catalog).generate(
            country,
            self.config.num_choices(),
            &mut self.rng,
        )?;
        self.slots = ChoiceSlots::new(names);

        let progress = self.session.progress();
        presenter.show_feedback(&Feedback::Cleared);
        presenter.show_progress(&progress);
        if let Err(err) = presenter.show_flag(country) {
            warn!(
                error = %err,
                country = country.name(),
                image = country.image_ref(),
                "flag could not be shown"
            );
        }
        presenter.show_choices(&self.slots);
        Ok(progress)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfiguration {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn slots(&self) -> &ChoiceSlots {
        &self.slots
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        self.session.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use quiz_core::model::{Region, RegionFilter, RoundSignal, RoundSummary};
    use quiz_core::time::fixed_clock;
    use storage::{InMemoryPreferenceStore, PREF_CHOICES, PREF_REGIONS};

    #[derive(Default)]
    struct RecordingPresenter {
        flags: Vec<String>,
        progress: Vec<String>,
        feedback: Vec<Feedback>,
        choices: Vec<ChoiceSlots>,
        summaries: Vec<RoundSummary>,
        restarts: usize,
        missing_images: bool,
    }

    impl QuizPresenter for RecordingPresenter {
        fn show_flag(&mut self, country: &Country) -> Result<(), RenderError> {
            if self.missing_images {
                return Err(RenderError::MissingImage {
                    image_ref: country.image_ref().to_string(),
                });
            }
            self.flags.push(country.name().to_string());
            Ok(())
        }

        fn show_progress(&mut self, progress: &QuizProgress) {
            self.progress.push(progress.to_string());
        }

        fn show_choices(&mut self, slots: &ChoiceSlots) {
            self.choices.push(slots.clone());
        }

        fn show_feedback(&mut self, feedback: &Feedback) {
            self.feedback.push(feedback.clone());
        }

        fn show_summary(&mut self, summary: &RoundSummary) {
            self.summaries.push(summary.clone());
        }

        fn notify_restart(&mut self) {
            self.restarts += 1;
        }
    }

    fn build_catalog() -> Catalog {
        let mut countries = Vec::new();
        for (region, prefix, count) in [
            (Region::Europe, "Eu", 20),
            (Region::Oceania, "Oc", 8),
            (Region::SouthAmerica, "Sa", 12),
        ] {
            for i in 0..count {
                let name = format!("{prefix}{i}");
                countries.push(Country::new(name.clone(), region, format!("{name}.png")).unwrap());
            }
        }
        Catalog::new(countries)
    }

    fn service() -> QuizLoopService {
        QuizLoopService::new(build_catalog(), QuizConfiguration::default())
            .with_clock(fixed_clock())
            .with_seed(42)
    }

    fn current_name(quiz: &QuizLoopService) -> String {
        quiz.session().current().unwrap().name().to_string()
    }

    fn wrong_choice(quiz: &QuizLoopService) -> String {
        let correct = current_name(quiz);
        quiz.slots()
            .names()
            .into_iter()
            .find(|name| *name != correct)
            .unwrap()
            .to_string()
    }

    #[test]
    fn restart_presents_first_question() {
        let mut quiz = service();
        let mut presenter = RecordingPresenter::default();

        let progress = quiz.restart(&mut presenter).unwrap();

        assert_eq!(progress.question_number, 1);
        assert_eq!(presenter.progress, vec!["Question 1 of 10"]);
        assert_eq!(presenter.feedback, vec![Feedback::Cleared]);
        assert_eq!(presenter.flags, vec![current_name(&quiz)]);
        let slots = quiz.slots();
        assert_eq!(slots.len(), 4);
        assert!(slots.names().contains(&current_name(&quiz).as_str()));
    }

    #[test]
    fn wrong_guess_disables_only_that_slot() {
        let mut quiz = service();
        let mut presenter = RecordingPresenter::default();
        quiz.restart(&mut presenter).unwrap();

        let wrong = wrong_choice(&quiz);
        let outcome = quiz.guess(&wrong, &mut presenter).unwrap();

        assert_eq!(outcome, GuessOutcome::Incorrect);
        assert!(!quiz.slots().is_enabled(&wrong));
        assert_eq!(quiz.slots().enabled_count(), 3);
        assert_eq!(presenter.feedback.last(), Some(&Feedback::Incorrect));
        assert!(quiz.pending_advance().is_none());
    }

    #[test]
    fn ruled_out_and_unknown_names_are_not_counted() {
        let mut quiz = service();
        let mut presenter = RecordingPresenter::default();
        quiz.restart(&mut presenter).unwrap();

        let wrong = wrong_choice(&quiz);
        quiz.guess(&wrong, &mut presenter).unwrap();
        for _ in 0..2 {
            assert!(matches!(
                quiz.guess(&wrong, &mut presenter),
                Err(QuizError::NotAChoice { .. })
            ));
        }
        assert!(matches!(
            quiz.guess("Not On The Board", &mut presenter),
            Err(QuizError::NotAChoice { .. })
        ));

        assert_eq!(quiz.session().total_guesses(), 1);
        assert_eq!(quiz.slots().enabled_count(), 3);
        assert_eq!(presenter.feedback.last(), Some(&Feedback::Incorrect));
    }

    #[test]
    fn typed_names_match_ignoring_case() {
        let mut quiz = service();
        let mut presenter = RecordingPresenter::default();
        quiz.restart(&mut presenter).unwrap();

        let typed = format!("  {}  ", current_name(&quiz).to_uppercase());
        let outcome = quiz.guess(&typed, &mut presenter).unwrap();

        assert_eq!(outcome, GuessOutcome::Correct(RoundSignal::Continue));
        assert_eq!(quiz.session().correct_guesses(), 1);
        assert_eq!(quiz.slots().enabled_count(), 0);
    }

    #[test]
    fn full_round_reports_summary() {
        let mut quiz = service();
        let mut presenter = RecordingPresenter::default();
        quiz.restart(&mut presenter).unwrap();

        let wrong = wrong_choice(&quiz);
        quiz.guess(&wrong, &mut presenter).unwrap();

        for question in 1..=10 {
            let name = current_name(&quiz);
            let outcome = quiz.guess(&name, &mut presenter).unwrap();
            assert_eq!(quiz.slots().enabled_count(), 0);
            if question < 10 {
                assert_eq!(outcome, GuessOutcome::Correct(RoundSignal::Continue));
                let ticket = quiz.pending_advance().unwrap();
                quiz.advance(ticket, &mut presenter).unwrap();
            } else {
                assert_eq!(outcome, GuessOutcome::Correct(RoundSignal::RoundComplete));
            }
        }

        assert_eq!(presenter.summaries.len(), 1);
        let summary = &presenter.summaries[0];
        assert_eq!(summary.total_guesses(), 11);
        assert!((summary.accuracy_percent() - 1000.0 / 11.0).abs() < 1e-9);
        assert!(quiz.pending_advance().is_none());
        assert_eq!(presenter.progress.last().unwrap(), "Question 10 of 10");
    }

    #[test]
    fn missing_flag_does_not_stop_the_quiz() {
        let mut quiz = service();
        let mut presenter = RecordingPresenter {
            missing_images: true,
            ..RecordingPresenter::default()
        };

        quiz.restart(&mut presenter).unwrap();
        let name = current_name(&quiz);
        quiz.guess(&name, &mut presenter).unwrap();
        let ticket = quiz.pending_advance().unwrap();
        let progress = quiz.advance(ticket, &mut presenter).unwrap();

        assert_eq!(progress.question_number, 2);
        assert!(presenter.flags.is_empty());
    }

    #[test]
    fn configuration_change_resets_the_round() {
        let mut quiz = service();
        let mut presenter = RecordingPresenter::default();
        quiz.restart(&mut presenter).unwrap();
        let name = current_name(&quiz);
        quiz.guess(&name, &mut presenter).unwrap();
        let stale = quiz.pending_advance().unwrap();

        let config = QuizConfiguration::new(6, RegionFilter::Only(Region::SouthAmerica)).unwrap();
        assert!(quiz.apply_configuration(config, &mut presenter).unwrap());

        assert_eq!(presenter.restarts, 1);
        assert_eq!(quiz.session().total_guesses(), 0);
        assert_eq!(quiz.slots().len(), 6);
        assert_eq!(
            quiz.session().current().unwrap().region(),
            Region::SouthAmerica
        );
        assert!(matches!(
            quiz.advance(stale, &mut presenter),
            Err(QuizError::StaleAdvance)
        ));

        assert!(!quiz.apply_configuration(config, &mut presenter).unwrap());
        assert_eq!(presenter.restarts, 1);
    }

    #[test]
    fn rejected_configuration_keeps_previous_round() {
        let mut quiz = service();
        let mut presenter = RecordingPresenter::default();
        quiz.restart(&mut presenter).unwrap();
        let round = quiz.session().round();

        let oceania = QuizConfiguration::default().with_region(RegionFilter::Only(Region::Oceania));
        let err = quiz.apply_configuration(oceania, &mut presenter).unwrap_err();

        assert!(matches!(
            err,
            QuizError::InsufficientCatalog {
                required: 10,
                available: 8
            }
        ));
        assert_eq!(quiz.config(), &QuizConfiguration::default());
        assert_eq!(quiz.session().round(), round);
        assert_eq!(presenter.restarts, 0);
    }

    #[test]
    fn preferences_are_normalized_and_applied() {
        let mut quiz = service();
        let mut presenter = RecordingPresenter::default();
        let store = InMemoryPreferenceStore::new();
        store.set(PREF_REGIONS, "South_America".into());
        store.set(PREF_CHOICES, "2".into());

        assert!(quiz.apply_preferences(&store, &mut presenter).unwrap());
        assert_eq!(
            quiz.config().region(),
            RegionFilter::Only(Region::SouthAmerica)
        );
        assert_eq!(quiz.slots().len(), 2);

        store.set(PREF_CHOICES, "12".into());
        assert!(matches!(
            quiz.apply_preferences(&store, &mut presenter),
            Err(QuizError::Config(_))
        ));
    }
}
