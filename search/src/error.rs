use crate::models::GeminiErrorBody;
use reqwest::StatusCode;
use thiserror::Error;

/// The closed set of ways a search can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    RateLimited,
    AuthFailure,
    UpstreamFailure,
    EmptyResponse,
    Configuration,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::AuthFailure => StatusCode::FORBIDDEN,
            Self::UpstreamFailure | Self::EmptyResponse | Self::Configuration => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum SearchError {
    /// Rejected locally before anything was sent upstream.
    #[error("{message}")]
    InvalidInput {
        message: String,
        details: Option<String>,
    },

    /// The provider refused the request content (HTTP 400/413).
    #[error("Invalid PDF format or content")]
    Rejected(String),

    #[error("API rate limit exceeded")]
    RateLimited(String),

    #[error("Authentication failed - check API key")]
    AuthFailure(String),

    #[error("Processing failed")]
    UpstreamFailure(String),

    #[error("Received empty response from AI service")]
    EmptyResponse,

    #[error("Server is not configured: {0}")]
    Configuration(String),
}

impl SearchError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } | Self::Rejected(_) => ErrorKind::InvalidInput,
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::AuthFailure(_) => ErrorKind::AuthFailure,
            Self::UpstreamFailure(_) => ErrorKind::UpstreamFailure,
            Self::EmptyResponse => ErrorKind::EmptyResponse,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// Diagnostic text behind the user-facing message, if there is any.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { details, .. } => details.as_deref(),
            Self::Rejected(d)
            | Self::RateLimited(d)
            | Self::AuthFailure(d)
            | Self::UpstreamFailure(d)
            | Self::Configuration(d) => Some(d),
            Self::EmptyResponse => None,
        }
    }

    /// Local validation details only describe the caller's own input.
    pub fn details_are_public(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Maps a non-success provider response onto the closed error set.
    pub fn from_upstream(status: StatusCode, body: &str) -> Self {
        let detail = match serde_json::from_str::<GeminiErrorBody>(body) {
            Ok(parsed) => match parsed.error.status {
                Some(code) => format!("{} ({}): {}", status.as_u16(), code, parsed.error.message),
                None => format!("{}: {}", status.as_u16(), parsed.error.message),
            },
            Err(_) => format!("{}: {}", status.as_u16(), body.trim()),
        };

        match status {
            StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE => Self::Rejected(detail),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::AuthFailure(detail),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(detail),
            _ => Self::UpstreamFailure(detail),
        }
    }

    /// Fallback for failures that carry no status code, only a message.
    pub fn from_message(message: &str) -> Self {
        let detail = message.to_string();
        if message.contains("400") {
            Self::Rejected(detail)
        } else if message.contains("429") {
            Self::RateLimited(detail)
        } else if message.contains("403") {
            Self::AuthFailure(detail)
        } else {
            Self::UpstreamFailure(detail)
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        let err = err.without_url();
        match err.status() {
            Some(status) => Self::from_upstream(status, &err.to_string()),
            None if err.is_timeout() => Self::UpstreamFailure(format!("request timed out: {err}")),
            None if err.is_decode() => Self::UpstreamFailure(format!("unreadable response: {err}")),
            None => Self::from_message(&err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
