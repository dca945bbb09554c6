use std::time::Duration;

use quiz_core::model::{Country, QuizConfiguration, Region, RegionFilter, RoundSummary};
use quiz_core::time::fixed_clock;
use services::{
    ADVANCE_DELAY, ChoiceSlots, Feedback, QuizLoopService, QuizPresenter, QuizProgress,
    QuizRunner, RenderError,
};

#[derive(Default)]
struct CountingPresenter {
    questions: usize,
    summary: Option<RoundSummary>,
    restarts: usize,
}

impl QuizPresenter for CountingPresenter {
    fn show_flag(&mut self, _country: &Country) -> Result<(), RenderError> {
        self.questions += 1;
        Ok(())
    }

    fn show_progress(&mut self, _progress: &QuizProgress) {}

    fn show_choices(&mut self, _slots: &ChoiceSlots) {}

    fn show_feedback(&mut self, _feedback: &Feedback) {}

    fn show_summary(&mut self, summary: &RoundSummary) {
        self.summary = Some(summary.clone());
    }

    fn notify_restart(&mut self) {
        self.restarts += 1;
    }
}

fn runner(config: QuizConfiguration) -> QuizRunner {
    let catalog = storage::bundled_catalog().unwrap();
    let quiz = QuizLoopService::new(catalog, config)
        .with_clock(fixed_clock())
        .with_seed(99);
    QuizRunner::new(quiz, ADVANCE_DELAY)
}

fn current_name(runner: &QuizRunner) -> String {
    runner.quiz().session().current().unwrap().name().to_string()
}

#[tokio::test(start_paused = true)]
async fn correct_guess_moves_on_after_delay() {
    let mut runner = runner(QuizConfiguration::default());
    let mut presenter = CountingPresenter::default();
    runner.restart(&mut presenter).unwrap();

    let name = current_name(&runner);
    runner.guess(&name, &mut presenter).unwrap();
    assert!(runner.is_advance_pending());
    assert_eq!(runner.quiz().progress().question_number, 1);

    let ticket = runner.next_advance().await.unwrap();
    let progress = runner.advance(ticket, &mut presenter).unwrap().unwrap();
    assert_eq!(progress.question_number, 2);
    assert_eq!(presenter.questions, 2);
}

#[tokio::test(start_paused = true)]
async fn plays_a_whole_round_in_one_region() {
    let config = QuizConfiguration::new(3, RegionFilter::Only(Region::NorthAmerica)).unwrap();
    let mut runner = runner(config);
    let mut presenter = CountingPresenter::default();
    runner.restart(&mut presenter).unwrap();

    for _ in 0..10 {
        let current = runner.quiz().session().current().unwrap().clone();
        assert_eq!(current.region(), Region::NorthAmerica);
        let outcome = runner.guess(current.name(), &mut presenter).unwrap();
        if outcome.completes_round() {
            break;
        }
        let ticket = runner.next_advance().await.unwrap();
        runner.advance(ticket, &mut presenter).unwrap();
    }

    let summary = presenter.summary.expect("round summary");
    assert_eq!(summary.total_guesses(), 10);
    assert_eq!(summary.accuracy_percent(), 100.0);
    assert!(!runner.is_advance_pending());
}

#[tokio::test(start_paused = true)]
async fn restart_cancels_the_pending_advance() {
    let mut runner = runner(QuizConfiguration::default());
    let mut presenter = CountingPresenter::default();
    runner.restart(&mut presenter).unwrap();

    let name = current_name(&runner);
    runner.guess(&name, &mut presenter).unwrap();
    let stale = runner.quiz().pending_advance().unwrap();

    let config = QuizConfiguration::default().with_region(RegionFilter::Only(Region::Oceania));
    assert!(runner.apply_configuration(config, &mut presenter).unwrap());
    assert!(!runner.is_advance_pending());
    assert_eq!(presenter.restarts, 1);

    let waited = tokio::time::timeout(Duration::from_secs(10), runner.next_advance()).await;
    assert!(waited.is_err());

    assert_eq!(runner.advance(stale, &mut presenter).unwrap(), None);
    assert_eq!(runner.quiz().progress().question_number, 1);
}
