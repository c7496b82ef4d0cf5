use std::collections::HashSet;

use crate::capture::{AnswerCapture, InputError, ValidationFailure};
use crate::model::{OptionId, Question, QuestionId, Response, ResponsePayload};

/// Transient input for ranked-order questions.
///
/// The working order is seeded with every option of the question and the only
/// mutation is [`RankingCapture::move_item`], so the order is always a
/// permutation of the option ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingCapture {
    question: Option<QuestionId>,
    order: Vec<OptionId>,
}

impl RankingCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn order(&self) -> &[OptionId] {
        &self.order
    }

    /// Move the item at `from` so it ends up at `to`, keeping the relative order
    /// of everything else. `from == to` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InputError::OutOfRange` if either index is past the end.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), InputError> {
        let len = self.order.len();
        for index in [from, to] {
            if index >= len {
                return Err(InputError::OutOfRange { index, len });
            }
        }
        if from != to {
            let item = self.order.remove(from);
            self.order.insert(to, item);
        }
        Ok(())
    }
}

impl AnswerCapture for RankingCapture {
    fn bind(&mut self, question: &Question, existing: Option<&Response>) {
        self.question = Some(question.id());
        self.order = match existing.map(|r| &r.payload) {
            Some(ResponsePayload::Ranking(saved)) if is_permutation(question, saved) => {
                saved.clone()
            }
            _ => question.option_ids().collect(),
        };
    }

    fn materialize(&self, question: &Question) -> Result<Response, ValidationFailure> {
        if self.question != Some(question.id()) {
            return Err(ValidationFailure::Unbound {
                question: question.id(),
            });
        }
        debug_assert!(is_permutation(question, &self.order));
        Ok(Response::ranking(question.id(), self.order.clone()))
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

fn is_permutation(question: &Question, order: &[OptionId]) -> bool {
    if order.len() != question.options().len() {
        return false;
    }
    let mut seen = HashSet::with_capacity(order.len());
    order
        .iter()
        .all(|id| question.has_option(*id) && seen.insert(*id))
}
