#![forbid(unsafe_code)]

pub mod advance;
pub mod error;
pub mod presenter;
pub mod quiz;

pub use quiz_core::Clock;

pub use advance::{ADVANCE_DELAY, AdvanceScheduler};
pub use error::{QuizError, RenderError};
pub use presenter::{Feedback, QuizPresenter};
pub use quiz::{
    AdvanceTicket, ChoiceGenerator, ChoiceSlot, ChoiceSlots, QuizLoopService, QuizProgress,
    QuizRunner, QuizSession, QuizState,
};
