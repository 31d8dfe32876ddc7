//! One-shot request/response relay to the remote text-generation endpoint.

mod http;

pub use http::HttpRelay;

/// Shown when the request failed or the reply could not be read.
pub const PROCESSING_FAILED_MESSAGE: &str =
    "Sorry, I couldn't process your request. Please try again later.";
/// Shown when the reply carried no usable `response` field.
pub const NO_RESPONSE_MESSAGE: &str = "No response received from the API";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayFailure {
    /// Connection, DNS or body read failure.
    Transport(String),
    /// Non-success HTTP status.
    Status(u16),
    /// Body was not valid JSON.
    Malformed(String),
    /// JSON body without a non-empty string `response` field.
    MissingResponse,
}

impl std::fmt::Display for RelayFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayFailure::Transport(e) => write!(f, "transport error: {e}"),
            RelayFailure::Status(code) => write!(f, "API request failed with status {code}"),
            RelayFailure::Malformed(e) => write!(f, "malformed response: {e}"),
            RelayFailure::MissingResponse => f.write_str("response field missing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Success(String),
    Failure(RelayFailure),
}

impl RelayOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RelayOutcome::Success(_))
    }

    /// Text to show in the chat: the reply, or a fixed fallback message.
    pub fn into_display_text(self) -> String {
        match self {
            RelayOutcome::Success(text) => text,
            RelayOutcome::Failure(RelayFailure::MissingResponse) => NO_RESPONSE_MESSAGE.to_string(),
            RelayOutcome::Failure(_) => PROCESSING_FAILED_MESSAGE.to_string(),
        }
    }
}

impl From<Result<String, RelayFailure>> for RelayOutcome {
    fn from(result: Result<String, RelayFailure>) -> Self {
        match result {
            Ok(text) => RelayOutcome::Success(text),
            Err(failure) => RelayOutcome::Failure(failure),
        }
    }
}

/// A best-effort single round trip. Implementations never return errors;
/// failures are folded into [`RelayOutcome::Failure`].
#[async_trait::async_trait]
pub trait Relay: Send + Sync {
    async fn send(&self, prompt: &str) -> RelayOutcome;
}
