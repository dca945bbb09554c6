mod choices;
mod progress;
mod runner;
mod session;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use choices::{ChoiceGenerator, ChoiceSlot, ChoiceSlots};
pub use progress::QuizProgress;
pub use runner::QuizRunner;
pub use session::{AdvanceTicket, QuizSession, QuizState};
pub use workflow::QuizLoopService;
