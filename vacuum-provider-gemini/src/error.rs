//! Internal error helpers for mapping HTTP/reqwest errors to [`ProviderError`].

use std::time::Duration;

use vacuum_provider::ProviderError;

/// Map an HTTP status code (from the Gemini API) to a [`ProviderError`].
///
/// Reference: <https://ai.google.dev/gemini-api/docs/troubleshooting>
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::Authentication(body.to_string()),
        400 => ProviderError::InvalidRequest(body.to_string()),
        404 => ProviderError::ModelNotFound(body.to_string()),
        // RESOURCE_EXHAUSTED
        429 => ProviderError::RateLimit(body.to_string()),
        500..=599 => ProviderError::ServiceUnavailable(body.to_string()),
        _ => ProviderError::InvalidRequest(format!("HTTP {status}: {body}")),
    }
}

/// Map a [`reqwest::Error`] to a [`ProviderError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(Duration::from_secs(30))
    } else {
        ProviderError::Network(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_404_to_model_not_found() {
        let err = map_http_status(reqwest::StatusCode::NOT_FOUND, "models/nope is not found");
        assert!(matches!(err, ProviderError::ModelNotFound(_)));
    }

    #[test]
    fn map_503_to_service_unavailable() {
        let err = map_http_status(reqwest::StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE");
        assert!(matches!(err, ProviderError::ServiceUnavailable(_)));
        assert!(err.is_retryable());
    }
}
