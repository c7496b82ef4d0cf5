use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_USER_ID: &str = "anonymous";
pub const DEFAULT_MAX_QUESTIONS: u32 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_VECTOR_DIMS: usize = 4;

/// Runtime settings for a quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Base URL of the HTTP backend; `None` means use an in-process backend.
    pub backend_url: Option<String>,
    pub user_id: String,
    /// Forward every saved answer to the backend before moving on.
    pub send_each_response: bool,
    /// Upper bound on catalog size, so a misbehaving backend cannot keep the loader going.
    pub max_questions: u32,
    /// Transport timeout for each backend request.
    pub request_timeout: Duration,
    pub vector_dims: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            user_id: DEFAULT_USER_ID.into(),
            send_each_response: true,
            max_questions: DEFAULT_MAX_QUESTIONS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            vector_dims: DEFAULT_VECTOR_DIMS,
        }
    }
}

impl QuizConfig {
    /// Read `QUIZ_*` environment variables over the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`QuizConfig::from_env`] with an injectable variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            backend_url: present("QUIZ_BACKEND_URL").map(|v| v.trim().to_owned()),
            user_id: present("QUIZ_USER_ID").unwrap_or(defaults.user_id),
            send_each_response: present("QUIZ_SEND_RESPONSES")
                .and_then(|v| parse_flag("QUIZ_SEND_RESPONSES", &v))
                .unwrap_or(defaults.send_each_response),
            max_questions: present("QUIZ_MAX_QUESTIONS")
                .and_then(|v| parse_or_warn("QUIZ_MAX_QUESTIONS", &v))
                .unwrap_or(defaults.max_questions),
            request_timeout: present("QUIZ_REQUEST_TIMEOUT_SECS")
                .and_then(|v| parse_or_warn::<u64>("QUIZ_REQUEST_TIMEOUT_SECS", &v))
                .map_or(defaults.request_timeout, Duration::from_secs),
            vector_dims: present("QUIZ_VECTOR_DIMS")
                .and_then(|v| parse_or_warn("QUIZ_VECTOR_DIMS", &v))
                .unwrap_or(defaults.vector_dims),
        }
    }
}

fn parse_or_warn<T: FromStr>(key: &str, raw: &str) -> Option<T> {
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        warn!(key, value = raw, "ignoring unparseable setting");
    }
    parsed
}

fn parse_flag(key: &str, raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(key, value = raw, "ignoring unparseable flag");
            None
        }
    }
}
