use thiserror::Error;

/// Result type alias for PagerDuty event operations
pub type Result<T> = std::result::Result<T, PagerDutyError>;

/// Errors that can occur when submitting events to PagerDuty
#[derive(Debug, Error)]
pub enum PagerDutyError {
    /// Failed to build HTTP client
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// The event could not be encoded as JSON; nothing was sent
    #[error("Failed to serialize event: {0}")]
    Serialize(#[source] serde_json::Error),

    /// HTTP request failed or no response was received
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest_middleware::Error),

    /// PagerDuty answered with something other than `202 Accepted`
    #[error("HTTP Status Code: {status}{}", format_message(.message))]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, if it could be read
        message: Option<String>,
    },

    /// PagerDuty accepted the event but the acknowledgment body was not understood
    #[error("Failed to decode event response: {0}")]
    Decode(#[source] serde_json::Error),
}

fn format_message(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(", Message: {message}"),
        None => String::new(),
    }
}

impl PagerDutyError {
    /// HTTP status code of an API error response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the error is worth retrying by the caller
    ///
    /// The client never retries on its own. Returns `true` for:
    /// - Connection errors
    /// - Timeout errors
    /// - Rate limiting (429)
    /// - Server errors (5xx status codes)
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(source) => {
                if let reqwest_middleware::Error::Reqwest(err) = source {
                    return err.is_connect() || err.is_timeout();
                }
                false
            }
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
