use backend::InMemoryBackend;
use quiz_core::model::{AnswerOption, OptionId, Question, QuestionError, QuestionId, QuestionKind};

fn options(first_id: u64, labels: &[&str]) -> Vec<AnswerOption> {
    labels
        .iter()
        .zip(first_id..)
        .map(|(label, id)| AnswerOption::new(OptionId::new(id), *label))
        .collect()
}

/// Built-in question set, one question of each supported kind.
pub fn demo_questions() -> Result<Vec<Question>, QuestionError> {
    Ok(vec![
        Question::new(
            QuestionId::new(1),
            QuestionKind::SingleSelect,
            1,
            "Which setting recharges you most?",
            options(1, &["A quiet evening at home", "A night out with friends", "A long walk outdoors"]),
        )?,
        Question::new(
            QuestionId::new(2),
            QuestionKind::MultiSelect,
            2,
            "Which of these do you enjoy? Pick any.",
            options(10, &["Reading", "Team sports", "Cooking", "Travel"]),
        )?,
        Question::new(
            QuestionId::new(3),
            QuestionKind::Scale,
            3,
            "How much do you like planning ahead? (1 = not at all, 5 = a lot)",
            options(20, &["1", "2", "3", "4", "5"]),
        )?,
        Question::new(
            QuestionId::new(4),
            QuestionKind::YesNo,
            4,
            "Do you prefer working alone?",
            options(30, &["Yes", "No"]),
        )?,
        Question::new(
            QuestionId::new(5),
            QuestionKind::FreeText,
            5,
            "Describe your ideal weekend in a sentence.",
            Vec::new(),
        )?,
        Question::new(
            QuestionId::new(6),
            QuestionKind::RankedOrder,
            6,
            "Rank these values, most important first.",
            options(40, &["Honesty", "Curiosity", "Loyalty", "Ambition"]),
        )?,
    ])
}

/// In-process backend seeded with [`demo_questions`].
pub fn demo_backend() -> Result<InMemoryBackend, QuestionError> {
    Ok(InMemoryBackend::with_questions(demo_questions()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Catalog;

    #[test]
    fn demo_set_covers_every_kind() {
        let questions = demo_questions().unwrap();
        let mut tags: Vec<u8> = questions.iter().map(|q| q.kind().tag()).collect();
        tags.sort_unstable();
        assert_eq!(tags, vec![0, 1, 2, 3, 4, 5]);
        assert!(Catalog::new(questions).is_ok());
    }
}
