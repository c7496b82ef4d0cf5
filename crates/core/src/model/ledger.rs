use std::collections::HashMap;

use crate::model::catalog::Catalog;
use crate::model::ids::QuestionId;
use crate::model::response::Response;

/// Last saved response per question for the current session.
///
/// Last write wins and no history is kept. Entries are never dropped when a
/// question is revisited; storage order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseLedger {
    entries: HashMap<QuestionId, Response>,
}

impl ResponseLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `question_id`.
    ///
    /// Returns the entry that was replaced, if any.
    pub fn upsert(&mut self, question_id: QuestionId, response: Response) -> Option<Response> {
        self.entries.insert(question_id, response)
    }

    #[must_use]
    pub fn get(&self, question_id: QuestionId) -> Option<&Response> {
        self.entries.get(&question_id)
    }

    #[must_use]
    pub fn contains(&self, question_id: QuestionId) -> bool {
        self.entries.contains_key(&question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &Response)> {
        self.entries.iter()
    }

    /// Saved responses in catalog order, skipping unanswered questions.
    pub fn ordered<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Response> + 'a {
        catalog.iter().filter_map(|q| self.entries.get(&q.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::OptionId;

    #[test]
    fn upsert_is_last_write_wins() {
        let mut ledger = ResponseLedger::new();
        let q = QuestionId::new(1);
        let a = Response::selection(q, [OptionId::new(1)]);
        let b = Response::selection(q, [OptionId::new(2)]);

        assert!(ledger.upsert(q, a.clone()).is_none());
        assert_eq!(ledger.upsert(q, b.clone()), Some(a));
        assert_eq!(ledger.get(q), Some(&b));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn repeated_identical_upsert_is_idempotent() {
        let mut ledger = ResponseLedger::new();
        let q = QuestionId::new(3);
        let a = Response::text(q, "same");

        ledger.upsert(q, a.clone());
        let snapshot = ledger.clone();
        ledger.upsert(q, a);
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn missing_entry_is_none() {
        let ledger = ResponseLedger::new();
        assert!(ledger.get(QuestionId::new(5)).is_none());
        assert!(ledger.is_empty());
    }
}
