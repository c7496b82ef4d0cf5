//! Per-kind answer capture strategies.
//!
//! Each strategy owns the transient input for one question kind. The
//! [`CaptureSet`] keeps one of each, binds the strategy that matches the active
//! question and resets the rest so input never leaks across kinds.

mod choice;
mod ranking;
mod text;

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{OptionId, Question, QuestionId, QuestionKind, Response};

pub use choice::{MultiChoiceCapture, SingleChoiceCapture};
pub use ranking::RankingCapture;
pub use text::FreeTextCapture;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Local validation failure that blocks a transition. Never reaches the network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationFailure {
    #[error("please choose an answer for question {number}")]
    NoSelection { number: u32 },

    #[error("please enter an answer for question {number}")]
    EmptyText { number: u32 },

    #[error("no input has been captured for question {question}")]
    Unbound { question: QuestionId },
}

/// Rejected user input. The capture state is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    #[error("there is no active question")]
    NoActiveQuestion,

    #[error("{input} does not apply to a {kind} question")]
    WrongKind {
        input: &'static str,
        kind: QuestionKind,
    },

    #[error("option {0} is not part of this question")]
    UnknownOption(OptionId),

    #[error("position {index} is out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
}

//
// ─── STRATEGY CONTRACT ─────────────────────────────────────────────────────────
//

/// Contract every capture strategy implements.
pub trait AnswerCapture {
    /// Initialize transient state from a saved response, or to empty.
    fn bind(&mut self, question: &Question, existing: Option<&Response>);

    /// Turn the transient state into a response for `question`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailure` if the input is incomplete.
    fn materialize(&self, question: &Question) -> Result<Response, ValidationFailure>;

    /// Drop all transient state.
    fn reset(&mut self);
}

/// One user interaction with the active question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureInput {
    /// Choose an option on a single-select, scale or yes/no question.
    Select(OptionId),
    /// Flip an option on a multi-select question.
    Toggle(OptionId),
    SetText(String),
    /// Reorder a ranked-order question (positions are 0-based).
    Move { from: usize, to: usize },
}

impl CaptureInput {
    fn name(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Toggle(_) => "toggle",
            Self::SetText(_) => "text entry",
            Self::Move { .. } => "move",
        }
    }
}

/// Read-only view of the active strategy's state, for drivers to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureView<'a> {
    Choice(Option<OptionId>),
    Choices(&'a BTreeSet<OptionId>),
    Text(&'a str),
    Ranking(&'a [OptionId]),
    Unsupported,
}

//
// ─── CAPTURE SET ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSet {
    active: Option<QuestionKind>,
    single: SingleChoiceCapture,
    scale: SingleChoiceCapture,
    yes_no: SingleChoiceCapture,
    multi: MultiChoiceCapture,
    text: FreeTextCapture,
    ranking: RankingCapture,
}

const HANDLED_KINDS: [QuestionKind; 6] = [
    QuestionKind::SingleSelect,
    QuestionKind::MultiSelect,
    QuestionKind::Scale,
    QuestionKind::YesNo,
    QuestionKind::FreeText,
    QuestionKind::RankedOrder,
];

impl CaptureSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of the question currently bound, if any.
    #[must_use]
    pub fn active_kind(&self) -> Option<QuestionKind> {
        self.active
    }

    /// Bind the strategy for `question` and reset every other one.
    pub fn activate(&mut self, question: &Question, existing: Option<&Response>) {
        let kind = question.kind();
        for slot_kind in HANDLED_KINDS {
            if let Some(slot) = self.slot_mut(slot_kind) {
                if slot_kind == kind {
                    slot.bind(question, existing);
                } else {
                    slot.reset();
                }
            }
        }
        self.active = Some(kind);
    }

    /// Reset everything, e.g. once the session is completed.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Materialize the active strategy.
    ///
    /// Returns `Ok(None)` for unhandled kinds, which have no strategy.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailure` if the input is incomplete.
    pub fn materialize(&self, question: &Question) -> Result<Option<Response>, ValidationFailure> {
        if self.active != Some(question.kind()) {
            return Err(ValidationFailure::Unbound {
                question: question.id(),
            });
        }
        match self.slot(question.kind()) {
            Some(slot) => slot.materialize(question).map(Some),
            None => Ok(None),
        }
    }

    /// Apply one interaction to the strategy bound to `question`.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the input does not fit the question.
    pub fn apply(&mut self, question: &Question, input: CaptureInput) -> Result<(), InputError> {
        let kind = question.kind();
        if self.active != Some(kind) {
            return Err(InputError::NoActiveQuestion);
        }
        let wrong_kind = |input: &CaptureInput| InputError::WrongKind {
            input: input.name(),
            kind,
        };

        match (input, kind) {
            (CaptureInput::Select(id), QuestionKind::SingleSelect) => self.single.select(question, id),
            (CaptureInput::Select(id), QuestionKind::Scale) => self.scale.select(question, id),
            (CaptureInput::Select(id), QuestionKind::YesNo) => self.yes_no.select(question, id),
            (CaptureInput::Toggle(id), QuestionKind::MultiSelect) => self.multi.toggle(question, id),
            (CaptureInput::SetText(text), QuestionKind::FreeText) => {
                self.text.set_text(question, text);
                Ok(())
            }
            (CaptureInput::Move { from, to }, QuestionKind::RankedOrder) => {
                self.ranking.move_item(from, to)
            }
            (other, _) => Err(wrong_kind(&other)),
        }
    }

    #[must_use]
    pub fn view(&self) -> CaptureView<'_> {
        match self.active {
            Some(QuestionKind::SingleSelect) => CaptureView::Choice(self.single.selected()),
            Some(QuestionKind::Scale) => CaptureView::Choice(self.scale.selected()),
            Some(QuestionKind::YesNo) => CaptureView::Choice(self.yes_no.selected()),
            Some(QuestionKind::MultiSelect) => CaptureView::Choices(self.multi.selected()),
            Some(QuestionKind::FreeText) => CaptureView::Text(self.text.text()),
            Some(QuestionKind::RankedOrder) => CaptureView::Ranking(self.ranking.order()),
            Some(QuestionKind::Unhandled(_)) | None => CaptureView::Unsupported,
        }
    }

    fn slot(&self, kind: QuestionKind) -> Option<&dyn AnswerCapture> {
        match kind {
            QuestionKind::SingleSelect => Some(&self.single),
            QuestionKind::Scale => Some(&self.scale),
            QuestionKind::YesNo => Some(&self.yes_no),
            QuestionKind::MultiSelect => Some(&self.multi),
            QuestionKind::FreeText => Some(&self.text),
            QuestionKind::RankedOrder => Some(&self.ranking),
            QuestionKind::Unhandled(_) => None,
        }
    }

    fn slot_mut(&mut self, kind: QuestionKind) -> Option<&mut dyn AnswerCapture> {
        match kind {
            QuestionKind::SingleSelect => Some(&mut self.single),
            QuestionKind::Scale => Some(&mut self.scale),
            QuestionKind::YesNo => Some(&mut self.yes_no),
            QuestionKind::MultiSelect => Some(&mut self.multi),
            QuestionKind::FreeText => Some(&mut self.text),
            QuestionKind::RankedOrder => Some(&mut self.ranking),
            QuestionKind::Unhandled(_) => None,
        }
    }
}
