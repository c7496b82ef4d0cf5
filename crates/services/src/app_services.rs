use std::sync::Arc;

use backend::Backend;
use quiz_core::model::UserId;

use crate::Clock;
use crate::config::QuizConfig;
use crate::error::AppServicesError;
use crate::loader::CatalogLoader;
use crate::quiz::QuizLoopService;
use crate::submission::{RandomVectorDeriver, SubmissionCoordinator};

/// Assembles app-facing services for one configured user.
#[derive(Clone)]
pub struct QuizServices {
    user_id: UserId,
    quiz_loop: Arc<QuizLoopService>,
    submissions: Arc<SubmissionCoordinator>,
}

impl QuizServices {
    /// Wire services over an already chosen backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::User` if the configured user id is blank.
    pub fn new(config: &QuizConfig, backend: Backend, clock: Clock) -> Result<Self, AppServicesError> {
        let user_id = UserId::parse(config.user_id.as_str())?;

        let loader = CatalogLoader::new(Arc::clone(&backend.questions), config.max_questions);
        let mut quiz_loop = QuizLoopService::new(loader);
        if config.send_each_response {
            quiz_loop = quiz_loop.with_response_sink(Arc::clone(&backend.responses));
        }

        let submissions = SubmissionCoordinator::new(
            Arc::clone(&backend.submissions),
            Arc::new(RandomVectorDeriver::new(config.vector_dims)),
        )
        .with_clock(clock);

        Ok(Self {
            user_id,
            quiz_loop: Arc::new(quiz_loop),
            submissions: Arc::new(submissions),
        })
    }

    /// Wire services over the HTTP backend at `config.backend_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if no URL is configured, the client cannot be
    /// built, or the user id is blank.
    pub fn connect(config: &QuizConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let Some(url) = config.backend_url.as_deref() else {
            return Err(AppServicesError::MissingBackendUrl);
        };
        let backend = Backend::http(url, config.request_timeout)?;
        Self::new(config, backend, clock)
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn submissions(&self) -> Arc<SubmissionCoordinator> {
        Arc::clone(&self.submissions)
    }
}
