use crate::error::{PlannerError, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for the generation service.
///
/// Built from the environment (after `.env` is loaded) and then overridden by
/// command-line flags through the `with_*` builders.
#[derive(Clone)]
pub struct PlannerConfig {
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout: Duration,
    max_tokens: Option<u32>,
}

impl std::fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: None,
        }
    }
}

impl PlannerConfig {
    /// Read configuration from process environment variables.
    ///
    /// A missing API key is not an error here; it is reported when the
    /// session starts and only blocks plan generation.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`PlannerConfig::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        config.api_key = non_empty("API_KEY").or_else(|| non_empty("OPENAI_API_KEY"));

        if let Some(base_url) =
            non_empty("OPENAI_BASE_URL").or_else(|| non_empty("OPENROUTER_BASE_URL"))
        {
            config.base_url = base_url;
        }

        if let Some(model) = non_empty("TRIP_PLANNER_MODEL") {
            config.model = model;
        }

        if let Some(raw) = non_empty("TRIP_PLANNER_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                PlannerError::Config(format!(
                    "TRIP_PLANNER_TIMEOUT_SECS must be a whole number of seconds, got `{raw}`"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = non_empty("TRIP_PLANNER_MAX_TOKENS") {
            let max_tokens: u32 = raw.trim().parse().map_err(|_| {
                PlannerError::Config(format!(
                    "TRIP_PLANNER_MAX_TOKENS must be a positive whole number, got `{raw}`"
                ))
            })?;
            if max_tokens == 0 {
                return Err(PlannerError::Config(
                    "TRIP_PLANNER_MAX_TOKENS must be greater than zero".to_string(),
                ));
            }
            config.max_tokens = Some(max_tokens);
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
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

    /// Cap the length of generated itineraries
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }
}
