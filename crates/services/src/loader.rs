use std::sync::Arc;

use backend::QuestionProvider;
use quiz_core::model::{Catalog, Question, UserId};
use tracing::{debug, info, instrument};

use crate::error::LoadError;

/// Bounded, sequential cursor over question positions `1, 2, 3, …`.
///
/// Each request completes before the next position is asked for. The cursor
/// ends at the provider's not-found answer and is fused afterwards: once it
/// has returned `Ok(None)` or an error, it keeps returning `Ok(None)`.
pub struct QuestionCursor<'a> {
    provider: &'a dyn QuestionProvider,
    user: &'a UserId,
    next_position: u32,
    limit: u32,
    loaded: usize,
    done: bool,
}

impl<'a> QuestionCursor<'a> {
    #[must_use]
    pub fn new(provider: &'a dyn QuestionProvider, user: &'a UserId, limit: u32) -> Self {
        Self {
            provider,
            user,
            next_position: 1,
            limit,
            loaded: 0,
            done: false,
        }
    }

    /// Number of questions yielded so far.
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Fetch the next question.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Backend` on any provider failure other than
    /// not-found, and `LoadError::TooManyQuestions` when the provider still has
    /// questions past the limit.
    pub async fn next_question(&mut self) -> Result<Option<Question>, LoadError> {
        if self.done {
            return Ok(None);
        }
        let position = self.next_position;

        let fetched = match self.provider.fetch_question(self.user, position).await {
            Ok(fetched) => fetched,
            Err(source) => {
                self.done = true;
                return Err(LoadError::Backend {
                    position,
                    loaded: self.loaded,
                    source,
                });
            }
        };

        let Some(question) = fetched else {
            debug!(position, "no more questions");
            self.done = true;
            return Ok(None);
        };

        if position > self.limit {
            self.done = true;
            return Err(LoadError::TooManyQuestions { limit: self.limit });
        }

        debug!(position, question = %question.id(), kind = %question.kind(), "fetched question");
        self.next_position = position.saturating_add(1);
        self.loaded += 1;
        Ok(Some(question))
    }
}

/// Builds the session catalog by draining a [`QuestionCursor`].
#[derive(Clone)]
pub struct CatalogLoader {
    provider: Arc<dyn QuestionProvider>,
    max_questions: u32,
}

impl CatalogLoader {
    #[must_use]
    pub fn new(provider: Arc<dyn QuestionProvider>, max_questions: u32) -> Self {
        Self {
            provider,
            max_questions,
        }
    }

    /// Load every question for `user`.
    ///
    /// Nothing is returned until the whole catalog is in; dropping the future
    /// part-way discards what was fetched so far.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if any fetch fails or the catalog is malformed.
    #[instrument(skip(self, user), fields(user = %user))]
    pub async fn load(&self, user: &UserId) -> Result<Catalog, LoadError> {
        let mut cursor = QuestionCursor::new(self.provider.as_ref(), user, self.max_questions);
        let mut questions = Vec::new();
        while let Some(question) = cursor.next_question().await? {
            questions.push(question);
        }
        info!(count = questions.len(), "question catalog loaded");
        Ok(Catalog::new(questions)?)
    }
}
