use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use quiz_core::model::{Question, QuestionId, Response, SubmissionPayload, UserId};

use crate::provider::{
    BackendError, QuestionProvider, ResponseSink, SubmissionAck, SubmissionEndpoint,
};

/// Backend operations that can be told to fail in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    SendResponse,
    Submit,
}

#[derive(Default)]
struct State {
    questions: Vec<Question>,
    saved: HashMap<(UserId, QuestionId), Response>,
    sent: Vec<(UserId, Response)>,
    submissions: Vec<(UserId, SubmissionPayload)>,
    fetched_positions: Vec<u32>,
    failures: HashMap<Operation, u32>,
}

/// In-memory stand-in for the quiz backend, for tests and demo runs.
///
/// Responses a user sends come back as the question's prior response on later
/// fetches, the way the real backend remembers earlier answers.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        let backend = Self::new();
        if let Ok(mut state) = backend.state.lock() {
            state.questions = questions;
        }
        backend
    }

    /// Make the next `times` calls of `operation` fail with `BackendError::Unavailable`.
    pub fn fail_next(&self, operation: Operation, times: u32) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(operation, times);
        }
    }

    /// Every response received, in arrival order.
    #[must_use]
    pub fn sent_responses(&self) -> Vec<(UserId, Response)> {
        self.state.lock().map(|s| s.sent.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn submissions(&self) -> Vec<(UserId, SubmissionPayload)> {
        self.state
            .lock()
            .map(|s| s.submissions.clone())
            .unwrap_or_default()
    }

    /// Positions requested so far, in request order.
    #[must_use]
    pub fn fetched_positions(&self) -> Vec<u32> {
        self.state
            .lock()
            .map(|s| s.fetched_positions.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, BackendError> {
        self.state
            .lock()
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }
}

impl State {
    fn take_failure(&mut self, operation: Operation) -> Result<(), BackendError> {
        match self.failures.get_mut(&operation) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(BackendError::Unavailable(format!(
                    "injected {operation:?} failure"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl QuestionProvider for InMemoryBackend {
    async fn fetch_question(
        &self,
        user: &UserId,
        position: u32,
    ) -> Result<Option<Question>, BackendError> {
        let mut state = self.lock()?;
        state.fetched_positions.push(position);
        state.take_failure(Operation::Fetch)?;

        let index = position
            .checked_sub(1)
            .ok_or(BackendError::InvalidPosition(position))?;
        let Some(question) = usize::try_from(index)
            .ok()
            .and_then(|i| state.questions.get(i))
            .cloned()
        else {
            return Ok(None);
        };

        match state.saved.get(&(user.clone(), question.id())) {
            Some(prior) => Ok(Some(
                question
                    .clone()
                    .with_prior_response(prior.clone())
                    .unwrap_or(question),
            )),
            None => Ok(Some(question)),
        }
    }
}

#[async_trait]
impl ResponseSink for InMemoryBackend {
    async fn send_response(&self, user: &UserId, response: &Response) -> Result<(), BackendError> {
        let mut state = self.lock()?;
        state.take_failure(Operation::SendResponse)?;
        state
            .saved
            .insert((user.clone(), response.question_id), response.clone());
        state.sent.push((user.clone(), response.clone()));
        Ok(())
    }
}

#[async_trait]
impl SubmissionEndpoint for InMemoryBackend {
    async fn submit(
        &self,
        user: &UserId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionAck, BackendError> {
        let mut state = self.lock()?;
        state.take_failure(Operation::Submit)?;
        state.submissions.push((user.clone(), payload.clone()));
        Ok(SubmissionAck {
            message: "Quiz submitted successfully!".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOption, OptionId, QuestionKind};

    fn user() -> UserId {
        UserId::parse("tester").unwrap()
    }

    fn questions() -> Vec<Question> {
        vec![
            Question::new(
                QuestionId::new(1),
                QuestionKind::SingleSelect,
                1,
                "Capital of Wisconsin?",
                vec![
                    AnswerOption::new(OptionId::new(0), "Milwaukee"),
                    AnswerOption::new(OptionId::new(1), "Madison"),
                ],
            )
            .unwrap(),
        ]
    }

    #[tokio::test]
    async fn fetch_past_the_end_is_not_found() {
        let backend = InMemoryBackend::with_questions(questions());
        assert!(backend.fetch_question(&user(), 1).await.unwrap().is_some());
        assert!(backend.fetch_question(&user(), 2).await.unwrap().is_none());
        assert_eq!(backend.fetched_positions(), vec![1, 2]);
    }

    #[tokio::test]
    async fn position_zero_is_rejected() {
        let backend = InMemoryBackend::with_questions(questions());
        let err = backend.fetch_question(&user(), 0).await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidPosition(0)));
    }

    #[tokio::test]
    async fn sent_response_comes_back_as_prior() {
        let backend = InMemoryBackend::with_questions(questions());
        let response = Response::selection(QuestionId::new(1), [OptionId::new(1)]);
        backend.send_response(&user(), &response).await.unwrap();

        let fetched = backend.fetch_question(&user(), 1).await.unwrap().unwrap();
        assert_eq!(fetched.prior_response(), Some(&response));

        let other = UserId::parse("someone-else").unwrap();
        let fetched = backend.fetch_question(&other, 1).await.unwrap().unwrap();
        assert!(fetched.prior_response().is_none());
    }

    #[tokio::test]
    async fn injected_failures_run_out() {
        let backend = InMemoryBackend::with_questions(questions());
        backend.fail_next(Operation::Submit, 1);
        let payload = SubmissionPayload::new(vec![0.5]);

        assert!(backend.submit(&user(), &payload).await.is_err());
        assert!(backend.submit(&user(), &payload).await.is_ok());
        assert_eq!(backend.submissions().len(), 1);
    }
}
