use quiz_core::Session;

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    /// 1-based position of the current question, `None` once completed.
    pub position: Option<usize>,
    pub answered: usize,
    /// Answerable questions still without a saved answer; 0 once completed.
    pub remaining: usize,
    pub is_complete: bool,
}

impl QuizProgress {
    #[must_use]
    pub fn of(session: &Session) -> Self {
        let total = session.catalog().len();
        let answered = session.ledger().len();
        let remaining = if session.is_complete() {
            0
        } else {
            session
                .catalog()
                .iter()
                .filter(|q| q.kind().is_handled() && !session.ledger().contains(q.id()))
                .count()
        };
        Self {
            total,
            position: session.position().map(|p| p + 1),
            answered,
            remaining,
            is_complete: session.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::capture::CaptureInput;
    use quiz_core::model::{Catalog, Question, QuestionId, QuestionKind, UserId};

    #[test]
    fn counts_answers_not_positions() {
        let questions = (1..=3)
            .map(|n| Question::new(QuestionId::new(n), QuestionKind::FreeText, n as u32, "q", vec![]).unwrap())
            .collect();
        let mut session = Session::new(UserId::parse("p").unwrap())
            .loaded(Catalog::new(questions).unwrap())
            .unwrap();

        let progress = QuizProgress::of(&session);
        assert_eq!(progress.position, Some(1));
        assert_eq!(progress.remaining, 3);

        session.input(CaptureInput::SetText("a".into())).unwrap();
        let session = session.apply_next().unwrap();
        let progress = QuizProgress::of(&session);
        assert_eq!(
            progress,
            QuizProgress {
                total: 3,
                position: Some(2),
                answered: 1,
                remaining: 2,
                is_complete: false,
            }
        );
    }

    #[test]
    fn unsupported_questions_are_not_remaining() {
        let questions = vec![
            Question::new(QuestionId::new(1), QuestionKind::Unhandled(9), 1, "Draw", vec![]).unwrap(),
            Question::new(QuestionId::new(2), QuestionKind::FreeText, 2, "Why?", vec![]).unwrap(),
        ];
        let session = Session::new(UserId::parse("p").unwrap())
            .loaded(Catalog::new(questions).unwrap())
            .unwrap();
        assert_eq!(QuizProgress::of(&session).remaining, 1);

        let mut session = session.apply_next().unwrap();
        session.input(CaptureInput::SetText("because".into())).unwrap();
        let session = session.apply_next().unwrap();
        let progress = QuizProgress::of(&session);
        assert!(progress.is_complete);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 0);
    }

    #[test]
    fn empty_quiz_is_complete() {
        let session = Session::new(UserId::parse("p").unwrap())
            .loaded(Catalog::empty())
            .unwrap();
        let progress = QuizProgress::of(&session);
        assert!(progress.is_complete);
        assert_eq!(progress.position, None);
        assert_eq!(progress.total, 0);
    }
}
