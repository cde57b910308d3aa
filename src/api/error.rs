use std::fmt;

/// API errors with user-friendly messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network-level failure (connection, DNS)
    Network(String),
    /// No response within the client timeout
    Timeout,
    /// HTTP error response (4xx, 5xx) carrying the message to show
    HttpStatus(u16, String),
    /// Failed to parse response
    Parse(String),
}

impl ApiError {
    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Error connecting to server".into(),
            Self::Timeout => "Request timed out. Please try again.".into(),
            Self::HttpStatus(_, msg) => msg.clone(),
            Self::Parse(details) => format!("Failed to parse response: {details}"),
        }
    }

    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus(code, _) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Network("connection failed".into())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::HttpStatus(
                status.as_u16(),
                status.canonical_reason().unwrap_or("").into(),
            )
        } else {
            Self::Network(err.to_string())
        }
    }
}
