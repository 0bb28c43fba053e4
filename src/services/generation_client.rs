use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    config::{PlannerConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS},
    core::generator::{FragmentStream, TextGenerator},
    error::{PlannerError, Result},
    services::{
        prompt::SYSTEM_PROMPT,
        stream::{parse_chat_stream, single_completion},
    },
};

/// Streaming client for an OpenAI-compatible chat completions endpoint.
///
/// One attempt per call: failures are returned as-is, never retried.
#[derive(Clone)]
pub struct GenerationClient {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    max_tokens: Option<u32>,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl GenerationClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: None,
        }
    }

    /// Build a client from configuration; fails when no API key is configured
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or(PlannerError::MissingCredential)?
            .to_string();

        let mut client = Self::new(api_key)
            .with_base_url(config.base_url())
            .with_model(config.model())
            .with_timeout(config.timeout());
        client.max_tokens = config.max_tokens();

        Ok(client)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, body: &Value) -> Result<reqwest::Response> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| PlannerError::Config(format!("Failed to build HTTP client: {err}")))?;

        let request_url = build_chat_url(&self.base_url);
        debug!(target: "trip_planner::generation", url = %request_url, model = %self.model, "sending generation request");

        let response = client
            .post(&request_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .header("X-Title", "trip-planner-rs")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let response_text = response.text().await.unwrap_or_default();
        let api_message = serde_json::from_str::<Value>(&response_text)
            .ok()
            .and_then(|json| {
                json.get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(|value| value.as_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or(response_text);

        Err(status_error(status, api_message))
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    async fn stream(&self, prompt: &str) -> Result<FragmentStream> {
        let body = ChatCompletionRequest::new(
            self.model.clone(),
            vec![
                json!({ "role": "system", "content": SYSTEM_PROMPT }),
                json!({ "role": "user", "content": prompt }),
            ],
        )
        .with_max_tokens(self.max_tokens)
        .with_stream(true)
        .into_value();

        let response = self.send(&body).await?;

        let is_event_stream = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("text/event-stream"))
            .unwrap_or(false);

        info!(
            target: "trip_planner::generation",
            status = %response.status(),
            streaming = is_event_stream,
            "generation response received"
        );

        if is_event_stream {
            Ok(parse_chat_stream(response))
        } else {
            let text = response.text().await?;
            Ok(single_completion(&text))
        }
    }
}

fn status_error(status: StatusCode, message: String) -> PlannerError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PlannerError::Auth(format!("HTTP {}: {}", status, message))
        }
        StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED => {
            PlannerError::Quota(format!("HTTP {}: {}", status, message))
        }
        _ => PlannerError::Api(format!("HTTP {} error: {}", status, message)),
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    max_tokens: Option<u32>,
    stream: bool,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            stream: false,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if self.stream {
            body["stream"] = json!(true);
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chat_url() {
        assert_eq!(
            build_chat_url("https://openrouter.ai/api/v1/"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("http://localhost:8080/v1/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_status_error_kinds() {
        let auth = status_error(StatusCode::UNAUTHORIZED, "bad key".to_string());
        assert_eq!(auth.error_code(), "AUTH_ERROR");

        let quota = status_error(StatusCode::TOO_MANY_REQUESTS, "slow down".to_string());
        assert_eq!(quota.error_code(), "QUOTA_ERROR");

        let other = status_error(StatusCode::BAD_GATEWAY, "upstream".to_string());
        assert_eq!(other.error_code(), "API_ERROR");
        assert!(other.to_string().contains("upstream"));
    }

    #[test]
    fn test_request_body() {
        let body = ChatCompletionRequest::new("m", vec![json!({"role": "user", "content": "hi"})])
            .with_max_tokens(Some(64))
            .with_stream(true)
            .into_value();
        assert_eq!(body["model"], "m");
        assert_eq!(body["stream"], true);
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = GenerationClient::from_config(&PlannerConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_CREDENTIAL");

        let client =
            GenerationClient::from_config(&PlannerConfig::default().with_api_key("k").with_model("x"))
                .unwrap();
        assert_eq!(client.model(), "x");
        assert!(!format!("{:?}", client).contains("\"k\""));
    }

    #[test]
    fn test_from_config_carries_max_tokens() {
        let config = PlannerConfig::default().with_api_key("k").with_max_tokens(900);
        let client = GenerationClient::from_config(&config).unwrap();
        assert_eq!(client.max_tokens, Some(900));

        let client =
            GenerationClient::from_config(&PlannerConfig::default().with_api_key("k")).unwrap();
        assert_eq!(client.max_tokens, None);
    }
}
