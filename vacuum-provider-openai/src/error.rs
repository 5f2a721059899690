//! Internal error helpers for mapping HTTP/reqwest errors to [`ProviderError`].

use std::time::Duration;

use vacuum_provider::ProviderError;

/// Map an HTTP status code (from the OpenAI API) to a [`ProviderError`].
///
/// Reference: <https://platform.openai.com/docs/guides/error-codes>
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::Authentication(body.to_string()),
        400 => ProviderError::InvalidRequest(body.to_string()),
        404 => ProviderError::ModelNotFound(body.to_string()),
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
    fn map_401_to_authentication() {
        let err = map_http_status(reqwest::StatusCode::UNAUTHORIZED, "Invalid API key");
        assert!(matches!(err, ProviderError::Authentication(_)));
    }

    #[test]
    fn map_429_to_rate_limit() {
        let err = map_http_status(reqwest::StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded");
        assert!(matches!(err, ProviderError::RateLimit(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn map_5xx_to_service_unavailable() {
        for code in [500, 502, 503, 504] {
            let status = reqwest::StatusCode::from_u16(code).unwrap();
            let err = map_http_status(status, "Server error");
            assert!(matches!(err, ProviderError::ServiceUnavailable(_)), "{code}");
        }
    }

    #[test]
    fn map_unknown_status_to_invalid_request() {
        let err = map_http_status(reqwest::StatusCode::IM_A_TEAPOT, "I'm a teapot");
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }
}
