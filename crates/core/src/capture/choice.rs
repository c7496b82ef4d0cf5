use std::collections::BTreeSet;

use crate::capture::{AnswerCapture, InputError, ValidationFailure};
use crate::model::{OptionId, Question, QuestionId, Response, ResponsePayload};

//
// ─── SINGLE CHOICE ─────────────────────────────────────────────────────────────
//

/// Transient input for single-select, scale and yes/no questions.
///
/// Holding an `Option` rather than a set makes "more than one" unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleChoiceCapture {
    question: Option<QuestionId>,
    selected: Option<OptionId>,
}

impl SingleChoiceCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current choice.
    ///
    /// # Errors
    ///
    /// Returns `InputError::UnknownOption` if `id` is not an option of `question`.
    pub fn select(&mut self, question: &Question, id: OptionId) -> Result<(), InputError> {
        if !question.has_option(id) {
            return Err(InputError::UnknownOption(id));
        }
        self.question = Some(question.id());
        self.selected = Some(id);
        Ok(())
    }

    #[must_use]
    pub fn selected(&self) -> Option<OptionId> {
        self.selected
    }
}

impl AnswerCapture for SingleChoiceCapture {
    fn bind(&mut self, question: &Question, existing: Option<&Response>) {
        self.question = Some(question.id());
        self.selected = match existing.map(|r| &r.payload) {
            Some(ResponsePayload::Selection(ids)) if ids.len() == 1 => ids
                .iter()
                .copied()
                .find(|id| question.has_option(*id)),
            _ => None,
        };
    }

    fn materialize(&self, question: &Question) -> Result<Response, ValidationFailure> {
        if self.question != Some(question.id()) {
            return Err(ValidationFailure::Unbound {
                question: question.id(),
            });
        }
        match self.selected {
            Some(id) => Ok(Response::selection(question.id(), [id])),
            None => Err(ValidationFailure::NoSelection {
                number: question.number(),
            }),
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

//
// ─── MULTI CHOICE ──────────────────────────────────────────────────────────────
//

/// Transient input for multi-select questions. An empty selection is a valid answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiChoiceCapture {
    question: Option<QuestionId>,
    selected: BTreeSet<OptionId>,
}

impl MultiChoiceCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id` in the selection.
    ///
    /// # Errors
    ///
    /// Returns `InputError::UnknownOption` if `id` is not an option of `question`.
    pub fn toggle(&mut self, question: &Question, id: OptionId) -> Result<(), InputError> {
        if !question.has_option(id) {
            return Err(InputError::UnknownOption(id));
        }
        self.question = Some(question.id());
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        Ok(())
    }

    #[must_use]
    pub fn selected(&self) -> &BTreeSet<OptionId> {
        &self.selected
    }
}

impl AnswerCapture for MultiChoiceCapture {
    fn bind(&mut self, question: &Question, existing: Option<&Response>) {
        self.question = Some(question.id());
        self.selected = match existing.map(|r| &r.payload) {
            Some(ResponsePayload::Selection(ids)) => ids
                .iter()
                .copied()
                .filter(|id| question.has_option(*id))
                .collect(),
            _ => BTreeSet::new(),
        };
    }

    fn materialize(&self, question: &Question) -> Result<Response, ValidationFailure> {
        if self.question != Some(question.id()) {
            return Err(ValidationFailure::Unbound {
                question: question.id(),
            });
        }
        Ok(Response::selection(
            question.id(),
            self.selected.iter().copied(),
        ))
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOption, QuestionKind};

    fn question(kind: QuestionKind) -> Question {
        let options = (1..=3)
            .map(|id| AnswerOption::new(OptionId::new(id), format!("o{id}")))
            .collect();
        Question::new(QuestionId::new(10), kind, 4, "pick", options).unwrap()
    }

    #[test]
    fn single_choice_without_selection_fails() {
        for kind in [QuestionKind::SingleSelect, QuestionKind::Scale, QuestionKind::YesNo] {
            let q = question(kind);
            let mut capture = SingleChoiceCapture::new();
            capture.bind(&q, None);
            assert_eq!(
                capture.materialize(&q),
                Err(ValidationFailure::NoSelection { number: 4 })
            );
        }
    }

    #[test]
    fn single_choice_with_one_selection_succeeds() {
        let q = question(QuestionKind::SingleSelect);
        let mut capture = SingleChoiceCapture::new();
        capture.bind(&q, None);
        capture.select(&q, OptionId::new(1)).unwrap();
        capture.select(&q, OptionId::new(2)).unwrap();

        let response = capture.materialize(&q).unwrap();
        assert_eq!(response, Response::selection(q.id(), [OptionId::new(2)]));
        assert!(response.check_against(&q).is_ok());
    }

    #[test]
    fn single_choice_rejects_unknown_option() {
        let q = question(QuestionKind::YesNo);
        let mut capture = SingleChoiceCapture::new();
        capture.bind(&q, None);
        assert_eq!(
            capture.select(&q, OptionId::new(9)),
            Err(InputError::UnknownOption(OptionId::new(9)))
        );
        assert_eq!(capture.selected(), None);
    }

    #[test]
    fn multi_choice_toggles_and_allows_empty() {
        let q = question(QuestionKind::MultiSelect);
        let mut capture = MultiChoiceCapture::new();
        capture.bind(&q, None);
        assert_eq!(
            capture.materialize(&q).unwrap(),
            Response::selection(q.id(), [])
        );

        capture.toggle(&q, OptionId::new(3)).unwrap();
        capture.toggle(&q, OptionId::new(1)).unwrap();
        capture.toggle(&q, OptionId::new(3)).unwrap();
        assert_eq!(
            capture.materialize(&q).unwrap(),
            Response::selection(q.id(), [OptionId::new(1)])
        );
    }

    #[test]
    fn bind_restores_saved_selection() {
        let q = question(QuestionKind::MultiSelect);
        let saved = Response::selection(q.id(), [OptionId::new(1), OptionId::new(2)]);
        let mut capture = MultiChoiceCapture::new();
        capture.bind(&q, Some(&saved));
        assert_eq!(capture.materialize(&q).unwrap(), saved);
    }

    #[test]
    fn materialize_for_other_question_is_unbound() {
        let q = question(QuestionKind::SingleSelect);
        let capture = SingleChoiceCapture::new();
        assert!(matches!(
            capture.materialize(&q),
            Err(ValidationFailure::Unbound { .. })
        ));
    }
}
