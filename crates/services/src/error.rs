//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuizConfigError, RoundSummaryError};
use storage::CatalogLoadError;

/// Errors emitted by the quiz session and the services driving it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("catalog has {available} distinct eligible entries, {required} required")]
    InsufficientCatalog { required: usize, available: usize },
    #[error("no questions left in this round")]
    Exhausted,
    #[error("no question is waiting for a guess")]
    NoQuestionLoaded,
    #[error("round already completed")]
    Completed,
    #[error("{name} is not an available choice")]
    NotAChoice { name: String },
    #[error("advance belongs to an earlier question or round")]
    StaleAdvance,
    #[error(transparent)]
    Config(#[from] QuizConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),
    #[error(transparent)]
    Summary(#[from] RoundSummaryError),
}

/// Failures at the rendering boundary. Logged and skipped, never fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    #[error("flag image not found: {image_ref}")]
    MissingImage { image_ref: String },
    #[error("render failed: {0}")]
    Failed(String),
}
