use std::sync::Arc;

use backend::ResponseSink;
use quiz_core::capture::CaptureInput;
use quiz_core::model::{QuestionId, Response, UserId};
use quiz_core::{Direction, Session};
use tracing::{debug, info, instrument, warn};

use crate::error::{LoadError, QuizError};
use crate::loader::CatalogLoader;
use crate::quiz::QuizProgress;

/// Result of one navigation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizStep {
    /// The question the session moved away from.
    pub left: QuestionId,
    /// The response saved for the question that was left, if it had one.
    pub saved: Option<Response>,
    pub progress: QuizProgress,
}

/// Orchestrates catalog loading and navigation with per-question saves.
#[derive(Clone)]
pub struct QuizLoopService {
    loader: CatalogLoader,
    responses: Option<Arc<dyn ResponseSink>>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(loader: CatalogLoader) -> Self {
        Self {
            loader,
            responses: None,
        }
    }

    /// Forward every saved response to `sink` before the session moves.
    #[must_use]
    pub fn with_response_sink(mut self, sink: Arc<dyn ResponseSink>) -> Self {
        self.responses = Some(sink);
        self
    }

    /// Load the full catalog and start a session for `user`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if any question fails to load.
    pub async fn start_session(&self, user: UserId) -> Result<Session, LoadError> {
        let catalog = self.loader.load(&user).await?;
        let session = Session::new(user).loaded(catalog)?;
        info!(
            session = %session.id(),
            questions = session.catalog().len(),
            "quiz session started"
        );
        Ok(session)
    }

    /// Apply one interaction to the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Input` if the input does not fit the question.
    pub fn input(&self, session: &mut Session, input: CaptureInput) -> Result<(), QuizError> {
        session.input(input).map_err(|e| {
            debug!(error = %e, "input rejected");
            QuizError::from(e)
        })
    }

    /// Validate, save and advance.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when validation fails or the save is rejected.
    pub async fn next(&self, session: &mut Session) -> Result<QuizStep, QuizError> {
        self.step(session, Direction::Next).await
    }

    /// Validate, save and go back.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when validation fails or the save is rejected.
    pub async fn previous(&self, session: &mut Session) -> Result<QuizStep, QuizError> {
        self.step(session, Direction::Previous).await
    }

    /// Validate, save and complete from the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when validation fails or the save is rejected.
    pub async fn submit_now(&self, session: &mut Session) -> Result<QuizStep, QuizError> {
        self.step(session, Direction::Submit).await
    }

    #[instrument(skip(self, session), fields(session = %session.id()))]
    async fn step(&self, session: &mut Session, direction: Direction) -> Result<QuizStep, QuizError> {
        let transition = match session.plan(direction) {
            Ok(transition) => transition,
            Err(e) => {
                debug!(error = %e, "transition rejected");
                return Err(e.into());
            }
        };

        match (&self.responses, transition.response()) {
            (Some(sink), Some(response)) => {
                sink.send_response(session.user_id(), response)
                    .await
                    .map_err(|source| {
                        warn!(question = %transition.question_id(), error = %source, "save failed");
                        QuizError::Save {
                            question: transition.question_id(),
                            source,
                        }
                    })?;
            }
            (_, None) => {
                warn!(question = %transition.question_id(), "passing over unsupported question");
            }
            (None, Some(_)) => {}
        }

        let saved = transition.response().cloned();
        let left = transition.question_id();
        let from = transition.from();
        *session = session.commit(transition)?;
        info!(
            question = %left,
            from = from + 1,
            to = ?session.position().map(|p| p + 1),
            "quiz moved"
        );

        Ok(QuizStep {
            left,
            saved,
            progress: QuizProgress::of(session),
        })
    }

    #[must_use]
    pub fn progress(&self, session: &Session) -> QuizProgress {
        QuizProgress::of(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::{InMemoryBackend, Operation};
    use quiz_core::SessionState;
    use quiz_core::model::{AnswerOption, OptionId, Question, QuestionId, QuestionKind};

    fn user() -> UserId {
        UserId::parse("workflow").unwrap()
    }

    fn questions() -> Vec<Question> {
        vec![
            Question::new(
                QuestionId::new(1),
                QuestionKind::YesNo,
                1,
                "Coffee?",
                vec![
                    AnswerOption::new(OptionId::new(1), "yes"),
                    AnswerOption::new(OptionId::new(2), "no"),
                ],
            )
            .unwrap(),
            Question::new(QuestionId::new(2), QuestionKind::Unhandled(9), 2, "Draw", vec![]).unwrap(),
            Question::new(QuestionId::new(3), QuestionKind::FreeText, 3, "Why?", vec![]).unwrap(),
        ]
    }

    fn service(backend: &InMemoryBackend, send: bool) -> QuizLoopService {
        let loop_service = QuizLoopService::new(CatalogLoader::new(Arc::new(backend.clone()), 50));
        if send {
            loop_service.with_response_sink(Arc::new(backend.clone()))
        } else {
            loop_service
        }
    }

    #[tokio::test]
    async fn saves_each_answer_before_moving() {
        let backend = InMemoryBackend::with_questions(questions());
        let service = service(&backend, true);
        let mut session = service.start_session(user()).await.unwrap();

        service.input(&mut session, CaptureInput::Select(OptionId::new(1))).unwrap();
        let step = service.next(&mut session).await.unwrap();
        assert_eq!(step.saved, Some(Response::selection(QuestionId::new(1), [OptionId::new(1)])));
        assert_eq!(session.state(), SessionState::Active(1));

        // unsupported question: nothing saved, nothing sent
        let step = service.next(&mut session).await.unwrap();
        assert_eq!(step.left, QuestionId::new(2));
        assert_eq!(step.saved, None);
        assert_eq!(session.state(), SessionState::Active(2));

        service.input(&mut session, CaptureInput::SetText("taste".into())).unwrap();
        let step = service.next(&mut session).await.unwrap();
        assert_eq!(step.left, QuestionId::new(3));
        assert!(step.progress.is_complete);
        assert_eq!(step.progress.answered, 2);
        assert_eq!(step.progress.remaining, 0);
        assert_eq!(backend.sent_responses().len(), 2);
    }

    #[tokio::test]
    async fn failed_save_leaves_session_in_place() {
        let backend = InMemoryBackend::with_questions(questions());
        let service = service(&backend, true);
        let mut session = service.start_session(user()).await.unwrap();
        service.input(&mut session, CaptureInput::Select(OptionId::new(2))).unwrap();

        backend.fail_next(Operation::SendResponse, 1);
        let err = service.next(&mut session).await.unwrap_err();
        assert!(matches!(err, QuizError::Save { question, .. } if question == QuestionId::new(1)));
        assert_eq!(session.state(), SessionState::Active(0));
        assert!(session.ledger().is_empty());

        service.next(&mut session).await.unwrap();
        assert_eq!(session.state(), SessionState::Active(1));
    }

    #[tokio::test]
    async fn validation_failure_sends_nothing() {
        let backend = InMemoryBackend::with_questions(questions());
        let service = service(&backend, true);
        let mut session = service.start_session(user()).await.unwrap();

        let err = service.next(&mut session).await.unwrap_err();
        assert!(matches!(err, QuizError::Navigation(_)));
        assert!(backend.sent_responses().is_empty());
        assert_eq!(session.state(), SessionState::Active(0));
    }

    #[tokio::test]
    async fn without_sink_answers_stay_local() {
        let backend = InMemoryBackend::with_questions(questions());
        let service = service(&backend, false);
        let mut session = service.start_session(user()).await.unwrap();

        service.input(&mut session, CaptureInput::Select(OptionId::new(1))).unwrap();
        let step = service.submit_now(&mut session).await.unwrap();
        assert!(step.progress.is_complete);
        assert_eq!(session.ledger().len(), 1);
        assert!(backend.sent_responses().is_empty());
    }

    #[tokio::test]
    async fn input_of_wrong_kind_is_rejected() {
        let backend = InMemoryBackend::with_questions(questions());
        let service = service(&backend, false);
        let mut session = service.start_session(user()).await.unwrap();

        let err = service
            .input(&mut session, CaptureInput::SetText("nope".into()))
            .unwrap_err();
        assert!(matches!(err, QuizError::Input(_)));
    }
}
