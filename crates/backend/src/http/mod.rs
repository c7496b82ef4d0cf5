//! HTTP adapter for the quiz backend.
//!
//! Every request carries the user id in the `X-User-Id` header.

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{Question, Response, SubmissionPayload, UserId};
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, instrument};

use crate::provider::{
    BackendError, QuestionProvider, ResponseSink, SubmissionAck, SubmissionEndpoint,
};
use wire::{QuestionDto, ResponseDataDto, SendResponseBody, SubmitAckDto};

pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns `BackendError::Unavailable` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        user: &UserId,
    ) -> Result<reqwest::Response, BackendError> {
        request
            .header(USER_ID_HEADER, user.as_str())
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))
    }
}

async fn error_for_status(response: reqwest::Response) -> BackendError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    BackendError::Status { status, message }
}

#[async_trait]
impl QuestionProvider for HttpBackend {
    #[instrument(skip(self, user), fields(user = %user))]
    async fn fetch_question(
        &self,
        user: &UserId,
        position: u32,
    ) -> Result<Option<Question>, BackendError> {
        let index = position
            .checked_sub(1)
            .ok_or(BackendError::InvalidPosition(position))?;
        let request = self
            .client
            .get(self.url("quiz/getQuestion"))
            .query(&[("index", index)]);
        let response = self.send(request, user).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("no question at this position");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let dto: QuestionDto = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        dto.into_question().map(Some)
    }
}

#[async_trait]
impl ResponseSink for HttpBackend {
    #[instrument(skip(self, user, response), fields(user = %user, question = %response.question_id))]
    async fn send_response(&self, user: &UserId, response: &Response) -> Result<(), BackendError> {
        let body = SendResponseBody {
            question_id: response.question_id.value(),
            response_data: ResponseDataDto::from_response(response),
        };
        let request = self.client.post(self.url("quiz/sendResponse")).json(&body);
        let reply = self.send(request, user).await?;

        if !reply.status().is_success() {
            return Err(error_for_status(reply).await);
        }
        Ok(())
    }
}

#[async_trait]
impl SubmissionEndpoint for HttpBackend {
    #[instrument(skip(self, user, payload), fields(user = %user))]
    async fn submit(
        &self,
        user: &UserId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionAck, BackendError> {
        let request = self.client.post(self.url("quiz/submit")).json(payload);
        let reply = self.send(request, user).await?;

        if !reply.status().is_success() {
            return Err(error_for_status(reply).await);
        }
        let ack: SubmitAckDto = reply
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(SubmissionAck {
            message: ack.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{OptionId, QuestionId, QuestionKind};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user() -> UserId {
        UserId::parse("105443google").unwrap()
    }

    fn backend(server: &MockServer) -> HttpBackend {
        HttpBackend::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetches_question_by_zero_based_index() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quiz/getQuestion"))
            .and(query_param("index", "0"))
            .and(header(USER_ID_HEADER, "105443google"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 11,
                "question_type": 1,
                "question": { "number": 1, "text": "Which of these are dairy products?" },
                "answers": [ { "id": 0, "text": "Milk" }, { "id": 1, "text": "Bread" } ],
                "prior_response": null
            })))
            .mount(&server)
            .await;

        let question = backend(&server)
            .fetch_question(&user(), 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(question.id(), QuestionId::new(11));
        assert_eq!(question.kind(), QuestionKind::MultiSelect);
    }

    #[tokio::test]
    async fn not_found_ends_the_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quiz/getQuestion"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetched = backend(&server).fetch_question(&user(), 3).await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quiz/getQuestion"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = backend(&server).fetch_question(&user(), 1).await.unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn sends_response_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/quiz/sendResponse"))
            .and(header(USER_ID_HEADER, "105443google"))
            .and(body_json(json!({
                "question_id": 5,
                "response_data": { "selected_ids": [0, 2] }
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let response = Response::selection(QuestionId::new(5), [OptionId::new(2), OptionId::new(0)]);
        backend(&server)
            .send_response(&user(), &response)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_response_is_a_hard_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/quiz/sendResponse"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
            .mount(&server)
            .await;

        let response = Response::text(QuestionId::new(1), "x");
        let err = backend(&server)
            .send_response(&user(), &response)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 400, .. }));
    }

    #[tokio::test]
    async fn submits_payload_and_reads_ack() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/quiz/submit"))
            .and(header(USER_ID_HEADER, "105443google"))
            .and(body_json(json!({ "personality_vector": [0.5, -0.25] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Quiz submitted successfully!",
                "receivedData": { "personality_vector": [0.5, -0.25] }
            })))
            .mount(&server)
            .await;

        let ack = backend(&server)
            .submit(&user(), &SubmissionPayload::new(vec![0.5, -0.25]))
            .await
            .unwrap();
        assert_eq!(ack.message, "Quiz submitted successfully!");
    }
}
