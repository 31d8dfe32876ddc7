use serde_json::Value;

use super::{Relay, RelayFailure, RelayOutcome};
use crate::config::Settings;

/// Relay that calls the prompt endpoint directly over HTTP.
///
/// The prompt travels URL-encoded in the `text` query parameter, the user id
/// (if any) in `userId`. There is no timeout and no retry.
pub struct HttpRelay {
    client: reqwest::Client,
    url: String,
    user_id: Option<String>,
}

impl HttpRelay {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            user_id: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        self.user_id = if user_id.is_empty() { None } else { Some(user_id) };
        self
    }

    pub fn from_settings(settings: &Settings, user_id: &str) -> Self {
        let relay = Self::new(settings.prompt_url());
        if settings.relay.send_user_id {
            relay.with_user_id(user_id)
        } else {
            relay
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self, prompt: &str) -> Result<String, RelayFailure> {
        let mut url = format!("{}?text={}", self.url, urlencoding::encode(prompt));
        if let Some(ref user_id) = self.user_id {
            url.push_str("&userId=");
            url.push_str(&urlencoding::encode(user_id));
        }

        tracing::debug!("Relaying prompt ({} chars) to {}", prompt.len(), self.url);

        let response = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| RelayFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayFailure::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RelayFailure::Transport(e.to_string()))?;

        extract_response(&body)
    }
}

/// Pull the `response` string out of a JSON reply body.
pub(crate) fn extract_response(body: &str) -> Result<String, RelayFailure> {
    let data: Value =
        serde_json::from_str(body).map_err(|e| RelayFailure::Malformed(e.to_string()))?;

    match data.get("response").and_then(|v| v.as_str()) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(RelayFailure::MissingResponse),
    }
}

#[async_trait::async_trait]
impl Relay for HttpRelay {
    async fn send(&self, prompt: &str) -> RelayOutcome {
        let result = self.request(prompt).await;
        if let Err(ref failure) = result {
            tracing::warn!("Relay request failed: {failure}");
        }
        result.into()
    }
}
