//! Error types for the REST client.

/// Errors raised while talking to the order/product API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("API request failed: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("API returned {status} for {context}")]
    Status { status: u16, context: String },

    /// The response body was not what the endpoint promises.
    #[error("Failed to decode API response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid API base URL: {0}")]
    BaseUrl(String),

    /// The API is unreachable (used by the in-memory API for failure injection).
    #[error("API unavailable")]
    Unavailable,
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
