use std::sync::Arc;

use backend::SubmissionEndpoint;
use chrono::{DateTime, Utc};
use quiz_core::model::{Catalog, ResponseLedger, SessionId, SubmissionPayload};
use quiz_core::{Clock, Session};
use rand::Rng;
use tracing::{info, instrument, warn};

use crate::error::SubmitError;

//
// ─── PAYLOAD DERIVATION ────────────────────────────────────────────────────────
//

/// Builds the opaque submission payload from a finished session.
pub trait PayloadDeriver: Send + Sync {
    fn derive(&self, catalog: &Catalog, ledger: &ResponseLedger) -> SubmissionPayload;
}

/// Placeholder derivation: a vector of uniform values in `[-1, 1]`, rounded to
/// four decimals. It does not look at the answers.
#[derive(Debug, Clone, Copy)]
pub struct RandomVectorDeriver {
    dims: usize,
}

impl RandomVectorDeriver {
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

impl PayloadDeriver for RandomVectorDeriver {
    fn derive(&self, _catalog: &Catalog, _ledger: &ResponseLedger) -> SubmissionPayload {
        let mut rng = rand::rng();
        let vector = (0..self.dims)
            .map(|_| round4(rng.random_range(-1.0..=1.0)))
            .collect();
        SubmissionPayload::new(vector)
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Where the submitted payload comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadSource {
    /// Ask the coordinator's [`PayloadDeriver`].
    Derived,
    /// Send exactly this payload.
    Override(SubmissionPayload),
}

//
// ─── COORDINATOR ───────────────────────────────────────────────────────────────
//

/// Outcome of an acknowledged submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub session_id: SessionId,
    pub payload: SubmissionPayload,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

/// Sends the final payload for a completed session.
///
/// Failures leave the session untouched so the user can retry; there is no
/// automatic retry.
#[derive(Clone)]
pub struct SubmissionCoordinator {
    endpoint: Arc<dyn SubmissionEndpoint>,
    deriver: Arc<dyn PayloadDeriver>,
    clock: Clock,
}

impl SubmissionCoordinator {
    #[must_use]
    pub fn new(endpoint: Arc<dyn SubmissionEndpoint>, deriver: Arc<dyn PayloadDeriver>) -> Self {
        Self {
            endpoint,
            deriver,
            clock: Clock::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Submit a completed session.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::NotCompleted` before the session is completed,
    /// `SubmitError::AlreadySubmitted` after a successful submission, and
    /// `SubmitError::Backend` when the endpoint fails.
    #[instrument(skip_all, fields(session = %session.id(), user = %session.user_id()))]
    pub async fn submit(
        &self,
        session: &mut Session,
        source: PayloadSource,
    ) -> Result<SubmissionReceipt, SubmitError> {
        if !session.is_complete() {
            return Err(SubmitError::NotCompleted);
        }
        if session.is_submitted() {
            return Err(SubmitError::AlreadySubmitted);
        }

        let payload = match source {
            PayloadSource::Derived => self.deriver.derive(session.catalog(), session.ledger()),
            PayloadSource::Override(payload) => payload,
        };

        let ack = match self.endpoint.submit(session.user_id(), &payload).await {
            Ok(ack) => ack,
            Err(e) => {
                warn!(error = %e, "quiz submission failed");
                return Err(e.into());
            }
        };

        session.mark_submitted();
        info!(answered = session.ledger().len(), "quiz submitted");
        Ok(SubmissionReceipt {
            session_id: session.id(),
            payload,
            message: ack.message,
            submitted_at: self.clock.now(),
        })
    }
}
