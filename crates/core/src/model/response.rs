use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};
use crate::model::question::{Question, QuestionKind};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Ways a response can fail to fit the question it claims to answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResponseError {
    #[error("response is for question {found}, expected {expected}")]
    WrongQuestion {
        expected: QuestionId,
        found: QuestionId,
    },

    #[error("{kind} question cannot take a {payload} response")]
    KindMismatch {
        kind: QuestionKind,
        payload: &'static str,
    },

    #[error("{kind} question needs exactly one selection, got {count}")]
    SelectionCount { kind: QuestionKind, count: usize },

    #[error("option {0} is not part of the question")]
    UnknownOption(OptionId),

    #[error("text response is blank")]
    BlankText,

    #[error("ranking must list every option exactly once")]
    NotAPermutation,
}

//
// ─── RESPONSE ──────────────────────────────────────────────────────────────────
//

/// Answer payload, shaped by the owning question's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResponsePayload {
    /// Chosen option ids. One entry for single-select, scale and yes/no.
    Selection(BTreeSet<OptionId>),
    Text(String),
    /// Every option id of the question, in the user's order.
    Ranking(Vec<OptionId>),
}

impl ResponsePayload {
    fn variant_name(&self) -> &'static str {
        match self {
            Self::Selection(_) => "selection",
            Self::Text(_) => "text",
            Self::Ranking(_) => "ranking",
        }
    }
}

/// The saved answer for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub question_id: QuestionId,
    pub payload: ResponsePayload,
}

impl Response {
    #[must_use]
    pub fn new(question_id: QuestionId, payload: ResponsePayload) -> Self {
        Self {
            question_id,
            payload,
        }
    }

    #[must_use]
    pub fn selection(question_id: QuestionId, ids: impl IntoIterator<Item = OptionId>) -> Self {
        Self::new(question_id, ResponsePayload::Selection(ids.into_iter().collect()))
    }

    #[must_use]
    pub fn text(question_id: QuestionId, text: impl Into<String>) -> Self {
        Self::new(question_id, ResponsePayload::Text(text.into()))
    }

    #[must_use]
    pub fn ranking(question_id: QuestionId, order: Vec<OptionId>) -> Self {
        Self::new(question_id, ResponsePayload::Ranking(order))
    }

    /// Check that this response is a legal answer to `question`.
    ///
    /// # Errors
    ///
    /// Returns the first `ResponseError` found.
    pub fn check_against(&self, question: &Question) -> Result<(), ResponseError> {
        if self.question_id != question.id() {
            return Err(ResponseError::WrongQuestion {
                expected: question.id(),
                found: self.question_id,
            });
        }

        let kind = question.kind();
        match (&self.payload, kind) {
            (ResponsePayload::Selection(ids), k) if k.is_single_choice() => {
                if ids.len() != 1 {
                    return Err(ResponseError::SelectionCount {
                        kind,
                        count: ids.len(),
                    });
                }
                check_known(question, ids.iter().copied())
            }
            (ResponsePayload::Selection(ids), QuestionKind::MultiSelect) => {
                check_known(question, ids.iter().copied())
            }
            (ResponsePayload::Text(text), QuestionKind::FreeText) => {
                if text.trim().is_empty() {
                    Err(ResponseError::BlankText)
                } else {
                    Ok(())
                }
            }
            (ResponsePayload::Ranking(order), QuestionKind::RankedOrder) => {
                let mut seen = HashSet::with_capacity(order.len());
                for id in order {
                    if !question.has_option(*id) {
                        return Err(ResponseError::UnknownOption(*id));
                    }
                    if !seen.insert(*id) {
                        return Err(ResponseError::NotAPermutation);
                    }
                }
                if seen.len() == question.options().len() {
                    Ok(())
                } else {
                    Err(ResponseError::NotAPermutation)
                }
            }
            (payload, kind) => Err(ResponseError::KindMismatch {
                kind,
                payload: payload.variant_name(),
            }),
        }
    }
}

fn check_known(
    question: &Question,
    mut ids: impl Iterator<Item = OptionId>,
) -> Result<(), ResponseError> {
    match ids.find(|id| !question.has_option(*id)) {
        Some(unknown) => Err(ResponseError::UnknownOption(unknown)),
        None => Ok(()),
    }
}
