use thiserror::Error;

/// Errors returned by [`crate::MoodMapClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure, or a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The session cookie contains bytes not allowed in a header value.
    #[error("invalid session cookie")]
    InvalidCookie,
}
