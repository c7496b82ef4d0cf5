use crate::capture::{AnswerCapture, ValidationFailure};
use crate::model::{Question, QuestionId, Response, ResponsePayload};

/// Transient input for free-text questions.
///
/// The text is saved as typed; only the emptiness check looks at the trimmed form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeTextCapture {
    question: Option<QuestionId>,
    text: String,
}

impl FreeTextCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, question: &Question, text: impl Into<String>) {
        self.question = Some(question.id());
        self.text = text.into();
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl AnswerCapture for FreeTextCapture {
    fn bind(&mut self, question: &Question, existing: Option<&Response>) {
        self.question = Some(question.id());
        self.text = match existing.map(|r| &r.payload) {
            Some(ResponsePayload::Text(text)) => text.clone(),
            _ => String::new(),
        };
    }

    fn materialize(&self, question: &Question) -> Result<Response, ValidationFailure> {
        if self.question != Some(question.id()) {
            return Err(ValidationFailure::Unbound {
                question: question.id(),
            });
        }
        if self.text.trim().is_empty() {
            return Err(ValidationFailure::EmptyText {
                number: question.number(),
            });
        }
        Ok(Response::text(question.id(), self.text.clone()))
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn question() -> Question {
        Question::new(QuestionId::new(2), QuestionKind::FreeText, 2, "Say hi", vec![]).unwrap()
    }

    #[test]
    fn blank_text_is_rejected() {
        let q = question();
        let mut capture = FreeTextCapture::new();
        capture.bind(&q, None);
        assert_eq!(
            capture.materialize(&q),
            Err(ValidationFailure::EmptyText { number: 2 })
        );

        capture.set_text(&q, "  \n\t ");
        assert!(capture.materialize(&q).is_err());
    }

    #[test]
    fn text_is_saved_as_typed() {
        let q = question();
        let mut capture = FreeTextCapture::new();
        capture.bind(&q, None);
        capture.set_text(&q, " hello ");
        assert_eq!(capture.materialize(&q).unwrap(), Response::text(q.id(), " hello "));
    }

    #[test]
    fn reset_clears_text() {
        let q = question();
        let mut capture = FreeTextCapture::new();
        capture.bind(&q, Some(&Response::text(q.id(), "kept")));
        assert_eq!(capture.text(), "kept");
        capture.reset();
        assert_eq!(capture.text(), "");
    }
}
