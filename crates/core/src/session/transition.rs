use crate::model::{Question, QuestionId, Response, SessionId};
use crate::session::{NavigationError, Session, SessionState};

/// The three user-initiated moves out of `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
    /// Finish the quiz from any position.
    Submit,
}

/// A validated, not yet applied transition.
///
/// Produced by [`Session::plan`]; carries the materialized response so a caller
/// can forward it somewhere before [`Session::commit`] saves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    session_id: SessionId,
    direction: Direction,
    from: usize,
    question_id: QuestionId,
    response: Option<Response>,
}

impl Transition {
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn from(&self) -> usize {
        self.from
    }

    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    /// `None` only when leaving a question of an unhandled kind.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }
}

impl Session {
    /// Check that `direction` is allowed and materialize the current answer.
    ///
    /// Previous is validated exactly like Next: the current answer must be
    /// complete before leaving the question in either direction.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError` when the move is not allowed or the current
    /// input does not validate.
    pub fn plan(&self, direction: Direction) -> Result<Transition, NavigationError> {
        let from = match self.state {
            SessionState::Loading => return Err(NavigationError::Loading),
            SessionState::Completed => return Err(NavigationError::Completed),
            SessionState::Active(p) => p,
        };
        if direction == Direction::Previous && from == 0 {
            return Err(NavigationError::AtFirstQuestion);
        }
        let Some(question) = self.catalog.get(from) else {
            return Err(NavigationError::Completed);
        };

        let response = self.captures.materialize(question)?;
        Ok(Transition {
            session_id: self.id,
            direction,
            from,
            question_id: question.id(),
            response,
        })
    }

    /// Save the planned response and move.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::ForeignTransition` if the transition was
    /// planned on another session, and `NavigationError::StaleTransition` if
    /// the session moved since the transition was planned.
    pub fn commit(&self, transition: Transition) -> Result<Self, NavigationError> {
        let planned_here = transition.session_id == self.id
            && self.catalog.get(transition.from).map(Question::id) == Some(transition.question_id);
        if !planned_here {
            return Err(NavigationError::ForeignTransition {
                planned_on: transition.session_id,
                session: self.id,
            });
        }
        if self.state != SessionState::Active(transition.from) {
            return Err(NavigationError::StaleTransition {
                planned: transition.from,
                actual: self.state,
            });
        }

        let mut next = self.clone();
        if let Some(response) = transition.response {
            next.ledger.upsert(transition.question_id, response);
        }

        match transition.direction {
            Direction::Next if transition.from + 1 < next.catalog.len() => {
                next.enter(transition.from + 1);
            }
            Direction::Next | Direction::Submit => next.finish(),
            Direction::Previous => next.enter(transition.from.saturating_sub(1)),
        }
        Ok(next)
    }

    /// Validate, save and advance. The last question completes the session.
    ///
    /// # Errors
    ///
    /// See [`Session::plan`].
    pub fn apply_next(&self) -> Result<Self, NavigationError> {
        self.commit(self.plan(Direction::Next)?)
    }

    /// Validate, save and go back one question.
    ///
    /// # Errors
    ///
    /// See [`Session::plan`].
    pub fn apply_previous(&self) -> Result<Self, NavigationError> {
        self.commit(self.plan(Direction::Previous)?)
    }

    /// Validate, save and complete the session from the current question.
    ///
    /// # Errors
    ///
    /// See [`Session::plan`].
    pub fn apply_submit(&self) -> Result<Self, NavigationError> {
        self.commit(self.plan(Direction::Submit)?)
    }
}
