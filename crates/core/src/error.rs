use thiserror::Error;

use crate::capture::{InputError, ValidationFailure};
use crate::model::{CatalogError, QuestionError, ResponseError};
use crate::session::NavigationError;

/// Umbrella error for callers that do not care which core check failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}
