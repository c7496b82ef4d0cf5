use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};
use crate::model::response::{Response, ResponseError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {question} lists option {option} more than once")]
    DuplicateOption {
        question: QuestionId,
        option: OptionId,
    },

    #[error("{kind} question {question} has no options")]
    NoOptions {
        question: QuestionId,
        kind: QuestionKind,
    },
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

/// The closed set of answer shapes a question can take.
///
/// Anything the backend sends that is not one of the six known tags is kept as
/// `Unhandled` so callers have to decide what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    SingleSelect,
    MultiSelect,
    Scale,
    YesNo,
    FreeText,
    RankedOrder,
    Unhandled(u8),
}

impl QuestionKind {
    /// Maps the backend's numeric `question_type` tag to a kind.
    #[must_use]
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0 => Self::SingleSelect,
            1 => Self::MultiSelect,
            2 => Self::Scale,
            3 => Self::YesNo,
            4 => Self::FreeText,
            5 => Self::RankedOrder,
            other => Self::Unhandled(other),
        }
    }

    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::SingleSelect => 0,
            Self::MultiSelect => 1,
            Self::Scale => 2,
            Self::YesNo => 3,
            Self::FreeText => 4,
            Self::RankedOrder => 5,
            Self::Unhandled(tag) => tag,
        }
    }

    /// Kinds answered by picking exactly one option.
    #[must_use]
    pub fn is_single_choice(self) -> bool {
        matches!(self, Self::SingleSelect | Self::Scale | Self::YesNo)
    }

    /// Kinds whose answer is built from the option list.
    #[must_use]
    pub fn needs_options(self) -> bool {
        self.is_single_choice() || matches!(self, Self::MultiSelect | Self::RankedOrder)
    }

    #[must_use]
    pub fn is_handled(self) -> bool {
        !matches!(self, Self::Unhandled(_))
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleSelect => f.write_str("single-select"),
            Self::MultiSelect => f.write_str("multi-select"),
            Self::Scale => f.write_str("scale"),
            Self::YesNo => f.write_str("yes/no"),
            Self::FreeText => f.write_str("free-text"),
            Self::RankedOrder => f.write_str("ranked-order"),
            Self::Unhandled(tag) => write!(f, "unhandled kind {tag}"),
        }
    }
}

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// A selectable answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    pub label: String,
}

impl AnswerOption {
    pub fn new(id: OptionId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A question definition as delivered by the backend.
///
/// Immutable once built; the only optional extra is the prior response the
/// user gave in an earlier visit, which seeds the capture strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    kind: QuestionKind,
    number: u32,
    prompt: String,
    options: Vec<AnswerOption>,
    prior_response: Option<Response>,
}

impl Question {
    /// Build a question, checking its option list.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::DuplicateOption` if two options share an id, and
    /// `QuestionError::NoOptions` if an option-based kind has nothing to choose.
    pub fn new(
        id: QuestionId,
        kind: QuestionKind,
        number: u32,
        prompt: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Result<Self, QuestionError> {
        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.id) {
                return Err(QuestionError::DuplicateOption {
                    question: id,
                    option: option.id,
                });
            }
        }

        if kind.needs_options() && options.is_empty() {
            return Err(QuestionError::NoOptions { question: id, kind });
        }

        Ok(Self {
            id,
            kind,
            number,
            prompt: prompt.into(),
            options,
            prior_response: None,
        })
    }

    /// Attach the response the user gave on a previous visit.
    ///
    /// # Errors
    ///
    /// Returns `ResponseError` if the response does not fit this question.
    pub fn with_prior_response(mut self, response: Response) -> Result<Self, ResponseError> {
        response.check_against(&self)?;
        self.prior_response = Some(response);
        Ok(self)
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    /// Display number shown to the user (not necessarily the catalog position).
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn prior_response(&self) -> Option<&Response> {
        self.prior_response.as_ref()
    }

    #[must_use]
    pub fn has_option(&self, id: OptionId) -> bool {
        self.options.iter().any(|o| o.id == id)
    }

    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Option ids in the order the backend listed them.
    pub fn option_ids(&self) -> impl Iterator<Item = OptionId> + '_ {
        self.options.iter().map(|o| o.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::response::ResponsePayload;

    fn options(ids: &[u64]) -> Vec<AnswerOption> {
        ids.iter()
            .map(|id| AnswerOption::new(OptionId::new(*id), format!("opt {id}")))
            .collect()
    }

    #[test]
    fn tag_mapping_covers_known_kinds() {
        for tag in 0..=5 {
            let kind = QuestionKind::from_tag(tag);
            assert!(kind.is_handled());
            assert_eq!(kind.tag(), tag);
        }
        assert_eq!(QuestionKind::from_tag(6), QuestionKind::Unhandled(6));
        assert!(!QuestionKind::from_tag(200).is_handled());
    }

    #[test]
    fn duplicate_options_are_rejected() {
        let err = Question::new(
            QuestionId::new(1),
            QuestionKind::MultiSelect,
            1,
            "Pick",
            options(&[1, 2, 1]),
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::DuplicateOption { .. }));
    }

    #[test]
    fn option_kinds_need_options() {
        for kind in [
            QuestionKind::SingleSelect,
            QuestionKind::MultiSelect,
            QuestionKind::Scale,
            QuestionKind::YesNo,
            QuestionKind::RankedOrder,
        ] {
            let err = Question::new(QuestionId::new(1), kind, 1, "?", vec![]).unwrap_err();
            assert!(matches!(err, QuestionError::NoOptions { .. }), "{kind}");
        }

        let text = Question::new(QuestionId::new(2), QuestionKind::FreeText, 2, "Say", vec![]);
        assert!(text.is_ok());
    }

    #[test]
    fn prior_response_must_fit() {
        let question = Question::new(
            QuestionId::new(1),
            QuestionKind::RankedOrder,
            1,
            "Rank",
            options(&[1, 2, 3]),
        )
        .unwrap();

        let partial = Response::new(
            question.id(),
            ResponsePayload::Ranking(vec![OptionId::new(1), OptionId::new(2)]),
        );
        assert!(question.clone().with_prior_response(partial).is_err());

        let full = Response::new(
            question.id(),
            ResponsePayload::Ranking(vec![OptionId::new(3), OptionId::new(1), OptionId::new(2)]),
        );
        let question = question.with_prior_response(full.clone()).unwrap();
        assert_eq!(question.prior_response(), Some(&full));
    }
}
