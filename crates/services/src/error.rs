//! Shared error types for the services crate.

use thiserror::Error;

use backend::BackendError;
use quiz_core::capture::InputError;
use quiz_core::model::{CatalogError, EmptyUserId, QuestionId};
use quiz_core::session::NavigationError;

/// Errors emitted while loading the question catalog.
///
/// Any of these means the session cannot start.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("could not load question {position} ({loaded} loaded so far): {source}")]
    Backend {
        position: u32,
        loaded: usize,
        #[source]
        source: BackendError,
    },
    #[error("the quiz has more than {limit} questions")]
    TooManyQuestions { limit: u32 },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// Errors emitted by quiz navigation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("could not save the answer to question {question}: {source}")]
    Save {
        question: QuestionId,
        #[source]
        source: BackendError,
    },
}

/// Errors emitted by the submission coordinator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("the quiz is not finished yet")]
    NotCompleted,
    #[error("the quiz has already been submitted")]
    AlreadySubmitted,
    #[error("submission failed: {0}")]
    Backend(#[from] BackendError),
}

/// Errors emitted while bootstrapping services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error("no backend URL configured")]
    MissingBackendUrl,
    #[error(transparent)]
    User(#[from] EmptyUserId),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
