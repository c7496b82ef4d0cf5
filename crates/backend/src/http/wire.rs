//! JSON shapes exchanged with the HTTP quiz backend, and their mapping to the domain.

use quiz_core::model::{
    AnswerOption, OptionId, Question, QuestionId, QuestionKind, Response, ResponsePayload,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::provider::BackendError;

fn decode<E: std::fmt::Display>(e: E) -> BackendError {
    BackendError::Decode(e.to_string())
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionDto {
    pub id: u64,
    pub question_type: u8,
    pub question: QuestionTextDto,
    #[serde(default)]
    pub answers: Vec<AnswerDto>,
    #[serde(default)]
    pub prior_response: Option<ResponseDataDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionTextDto {
    pub number: u32,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerDto {
    pub id: u64,
    pub text: String,
}

/// `response_data` / `prior_response`: one field is set depending on the question kind.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ResponseDataDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_ids: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Vec<u64>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendResponseBody {
    pub question_id: u64,
    pub response_data: ResponseDataDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitAckDto {
    #[serde(default)]
    pub message: String,
}

impl QuestionDto {
    /// Convert into a domain question. A prior response that does not fit is dropped.
    pub(crate) fn into_question(self) -> Result<Question, BackendError> {
        let id = QuestionId::new(self.id);
        let options = self
            .answers
            .into_iter()
            .map(|a| AnswerOption::new(OptionId::new(a.id), a.text))
            .collect();
        let question = Question::new(
            id,
            QuestionKind::from_tag(self.question_type),
            self.question.number,
            self.question.text,
            options,
        )
        .map_err(decode)?;

        let Some(prior) = self
            .prior_response
            .and_then(|data| data.into_response(&question))
        else {
            return Ok(question);
        };

        match question.clone().with_prior_response(prior) {
            Ok(with_prior) => Ok(with_prior),
            Err(e) => {
                warn!(question = %id, error = %e, "dropping prior response that does not fit");
                Ok(question)
            }
        }
    }
}

impl ResponseDataDto {
    pub(crate) fn from_response(response: &Response) -> Self {
        match &response.payload {
            ResponsePayload::Selection(ids) => Self {
                selected_ids: Some(ids.iter().map(OptionId::value).collect()),
                ..Self::default()
            },
            ResponsePayload::Text(text) => Self {
                text: Some(text.clone()),
                ..Self::default()
            },
            ResponsePayload::Ranking(order) => Self {
                ranking: Some(order.iter().map(OptionId::value).collect()),
                ..Self::default()
            },
        }
    }

    /// Pick the field that matches the question's kind.
    pub(crate) fn into_response(self, question: &Question) -> Option<Response> {
        let to_ids = |raw: Vec<u64>| raw.into_iter().map(OptionId::new);
        let payload = match question.kind() {
            QuestionKind::SingleSelect
            | QuestionKind::MultiSelect
            | QuestionKind::Scale
            | QuestionKind::YesNo => ResponsePayload::Selection(to_ids(self.selected_ids?).collect()),
            QuestionKind::FreeText => ResponsePayload::Text(self.text?),
            QuestionKind::RankedOrder => ResponsePayload::Ranking(to_ids(self.ranking?).collect()),
            QuestionKind::Unhandled(_) => return None,
        };
        Some(Response::new(question.id(), payload))
    }
}
