//! Carrier client error types.

/// Errors from the carrier HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum CarrierError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid API key or access denied
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response body as the wire format
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Response parsed but contained no service point list
    #[error("response contained no service point list")]
    MissingPayload,
}
