#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod loader;
pub mod quiz;
pub mod submission;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use config::QuizConfig;
pub use error::{AppServicesError, LoadError, QuizError, SubmitError};
pub use loader::{CatalogLoader, QuestionCursor};
pub use quiz::{QuizLoopService, QuizProgress, QuizStep};
pub use submission::{
    PayloadDeriver, PayloadSource, RandomVectorDeriver, SubmissionCoordinator, SubmissionReceipt,
};
