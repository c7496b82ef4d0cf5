//! The quiz session value and its navigation state machine.
//!
//! `Loading -> Active(position) -> Completed`. Transitions are computed by
//! pure functions on `&Session` and return a new `Session`; nothing here
//! performs I/O.

mod transition;

use std::fmt;

use thiserror::Error;

use crate::capture::{CaptureInput, CaptureSet, CaptureView, InputError, ValidationFailure};
use crate::model::{Catalog, Question, ResponseLedger, SessionId, UserId};

pub use transition::{Direction, Transition};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("questions are still loading")]
    Loading,

    #[error("catalog has already been loaded")]
    AlreadyLoaded,

    #[error("session already completed")]
    Completed,

    #[error("already at the first question")]
    AtFirstQuestion,

    #[error("transition was planned from position {planned} but the session is at {actual:?}")]
    StaleTransition {
        planned: usize,
        actual: SessionState,
    },

    #[error("transition was planned on session {planned_on}, not {session}")]
    ForeignTransition {
        planned_on: SessionId,
        session: SessionId,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationFailure),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    /// 0-based position of the current question.
    Active(usize),
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One user's pass through a quiz.
///
/// The catalog is written once by [`Session::loaded`]. Position and ledger
/// change only through [`Session::commit`] (and the `apply_*` helpers built on
/// it); capture input is transient and changes through [`Session::input`].
#[derive(Clone)]
pub struct Session {
    id: SessionId,
    user_id: UserId,
    catalog: Catalog,
    state: SessionState,
    ledger: ResponseLedger,
    captures: CaptureSet,
    submitted: bool,
}

impl Session {
    /// Create a session in the `Loading` state.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: SessionId::random(),
            user_id,
            catalog: Catalog::empty(),
            state: SessionState::Loading,
            ledger: ResponseLedger::new(),
            captures: CaptureSet::new(),
            submitted: false,
        }
    }

    /// Install the fully loaded catalog.
    ///
    /// An empty catalog goes straight to `Completed`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::AlreadyLoaded` unless the session is `Loading`.
    pub fn loaded(&self, catalog: Catalog) -> Result<Self, NavigationError> {
        if self.state != SessionState::Loading {
            return Err(NavigationError::AlreadyLoaded);
        }
        let mut next = self.clone();
        next.catalog = catalog;
        if next.catalog.is_empty() {
            next.state = SessionState::Completed;
        } else {
            next.enter(0);
        }
        Ok(next)
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn ledger(&self) -> &ResponseLedger {
        &self.ledger
    }

    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self.state {
            SessionState::Active(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.position().and_then(|p| self.catalog.get(p))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Record that the final submission was acknowledged.
    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    #[must_use]
    pub fn capture_view(&self) -> CaptureView<'_> {
        self.captures.view()
    }

    /// Apply one interaction to the current question's strategy.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if there is no current question or the input does not fit it.
    pub fn input(&mut self, input: CaptureInput) -> Result<(), InputError> {
        let Some(position) = self.position() else {
            return Err(InputError::NoActiveQuestion);
        };
        let Some(question) = self.catalog.get(position) else {
            return Err(InputError::NoActiveQuestion);
        };
        self.captures.apply(question, input)
    }

    /// Move to `position` and bind its strategy: ledger first, then the
    /// question's prior response, then empty.
    fn enter(&mut self, position: usize) {
        let Some(question) = self.catalog.get(position) else {
            self.finish();
            return;
        };
        let existing = self
            .ledger
            .get(question.id())
            .or_else(|| question.prior_response());
        self.captures.activate(question, existing);
        self.state = SessionState::Active(position);
    }

    fn finish(&mut self) {
        self.captures.clear();
        self.state = SessionState::Completed;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("questions", &self.catalog.len())
            .field("state", &self.state)
            .field("answered", &self.ledger.len())
            .field("submitted", &self.submitted)
            .finish_non_exhaustive()
    }
}
