//! Error types for the Riot stats client library.

use thiserror::Error;

/// The main error type for all Riot client operations.
#[derive(Error, Debug)]
pub enum RiotError {
    /// HTTP transport failed (connection, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed.
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// The requested resource does not exist (HTTP 404).
    ///
    /// For identity resolution this means the Riot ID is unknown; for other
    /// endpoints it means the player has no data there.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API key was rejected (HTTP 401 or 403).
    ///
    /// Distinct from [`RiotError::Network`] so callers can prompt for a new
    /// key instead of treating it as a transient fault.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-2xx response or transport-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The response parsed as JSON but did not match the expected shape,
    /// or an expected element (e.g. the requested participant in a match)
    /// was missing.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Disk I/O error from the cache layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No API key was configured.
    ///
    /// This is a configuration fault: the client was built without a token.
    #[error("Missing API key: a Riot API token is required")]
    MissingApiKey,
}

impl RiotError {
    /// Whether this error indicates a credential problem rather than a
    /// transient or data fault.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, RiotError::Unauthorized(_) | RiotError::MissingApiKey)
    }

    /// Map an HTTP status code and response body to an error.
    ///
    /// Returns `None` for 2xx statuses.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Option<Self> {
        if status.is_success() {
            return None;
        }
        let detail = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {body}")
        };
        Some(match status.as_u16() {
            404 => RiotError::NotFound(detail),
            401 | 403 => RiotError::Unauthorized(detail),
            _ => RiotError::Network(detail),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = RiotError::from_status(reqwest::StatusCode::NOT_FOUND, "").unwrap();
        assert!(matches!(err, RiotError::NotFound(_)));

        let err = RiotError::from_status(reqwest::StatusCode::UNAUTHORIZED, "bad key").unwrap();
        assert!(matches!(err, RiotError::Unauthorized(_)));
        assert!(err.is_auth_failure());

        let err = RiotError::from_status(reqwest::StatusCode::FORBIDDEN, "").unwrap();
        assert!(matches!(err, RiotError::Unauthorized(_)));

        let err =
            RiotError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom").unwrap();
        assert!(matches!(err, RiotError::Network(_)));
    }

    #[test]
    fn test_success_is_not_an_error() {
        assert!(RiotError::from_status(reqwest::StatusCode::OK, "{}").is_none());
    }
}
