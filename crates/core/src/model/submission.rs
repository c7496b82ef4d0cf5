use serde::{Deserialize, Serialize};

/// Final payload sent when a quiz is submitted.
///
/// The engine does not interpret the vector; it is derived elsewhere or supplied
/// by the user and forwarded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub personality_vector: Vec<f64>,
}

impl SubmissionPayload {
    #[must_use]
    pub fn new(personality_vector: Vec<f64>) -> Self {
        Self { personality_vector }
    }
}
