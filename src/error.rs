use thiserror::Error;

/// Main error type for the trip planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key not found. Set API_KEY (or OPENAI_API_KEY) in the environment or .env file")]
    MissingCredential,

    #[error("End date must be after the start date ({start} > {end})")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Quota exceeded: {0}")]
    Quota(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Whether the user can fix this by correcting input and resubmitting
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PlannerError::Io(_))
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::MissingCredential => "MISSING_CREDENTIAL",
            PlannerError::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            PlannerError::MissingField(_) => "MISSING_FIELD",
            PlannerError::InvalidInput(_) => "INVALID_INPUT",
            PlannerError::Http(_) => "HTTP_ERROR",
            PlannerError::Auth(_) => "AUTH_ERROR",
            PlannerError::Quota(_) => "QUOTA_ERROR",
            PlannerError::Api(_) => "API_ERROR",
            PlannerError::Stream(_) => "STREAM_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::Io(_) => "IO_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "recoverable": self.is_recoverable()
            }
        })
    }
}
