//! TfL client error types.

/// Errors from talking to the TfL API (or the mock standing in for it).
#[derive(Debug, thiserror::Error)]
pub enum TflError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error(
        "JSON parse error: {message}{}",
        .body.as_deref().map(|b| format!(" (body: {b})")).unwrap_or_default()
    )]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Invalid or missing application key
    #[error("unauthorized: check TFL_APP_KEY or --key")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by TfL API")]
    RateLimited,

    /// The requested resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Base URL could not be used to build a request
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Mock data directory is missing or malformed
    #[error("mock data: {0}")]
    MockData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TflError::Unauthorized;
        assert_eq!(err.to_string(), "unauthorized: check TFL_APP_KEY or --key");

        let err = TflError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = TflError::Json {
            message: "expected string".into(),
            body: Some("{}".into()),
        };
        assert_eq!(err.to_string(), "JSON parse error: expected string (body: {})");

        let err = TflError::Json {
            message: "expected string".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "JSON parse error: expected string");

        let err = TflError::NotFound("/StopPoint/XYZ".into());
        assert_eq!(err.to_string(), "not found: /StopPoint/XYZ");
    }
}
