#![forbid(unsafe_code)]

pub mod http;
pub mod memory;
pub mod provider;

pub use http::HttpBackend;
pub use memory::{InMemoryBackend, Operation};
pub use provider::{
    Backend, BackendError, QuestionProvider, ResponseSink, SubmissionAck, SubmissionEndpoint,
};
