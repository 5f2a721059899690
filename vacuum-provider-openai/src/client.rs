//! OpenAI API client struct and builder.

use std::future::Future;

use vacuum_provider::{CompletionRequest, CompletionResponse, Provider, ProviderError};

use crate::error::{map_http_status, map_reqwest_error};
use crate::mapping::{from_api_response, to_api_request};

/// Default model used when none is specified on the request.
const DEFAULT_MODEL: &str = "gpt-4";

/// Default OpenAI API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Client for the OpenAI Chat Completions API.
///
/// # Example
///
/// ```no_run
/// use vacuum_provider_openai::OpenAi;
///
/// let client = OpenAi::new("sk-...").model("gpt-4o");
/// ```
pub struct OpenAi {
    /// OpenAI API key (`OPENAI_API_KEY`).
    pub(crate) api_key: String,
    /// Default model identifier used when the request does not specify one.
    pub(crate) model: String,
    /// API base URL (override for testing or compatible servers).
    pub(crate) base_url: String,
    /// Optional organization id, sent as `OpenAI-Organization`.
    pub(crate) organization: Option<String>,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl OpenAi {
    /// Create a new client with the given API key.
    ///
    /// Default model: `gpt-4`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            organization: None,
            client: reqwest::Client::new(),
        }
    }

    /// Override the default model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Bill requests to an organization.
    #[must_use]
    pub fn organization(mut self, org: impl Into<String>) -> Self {
        self.organization = Some(org.into());
        self
    }

    /// The default model.
    pub fn default_model(&self) -> &str {
        &self.model
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl Provider for OpenAi {
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, ProviderError>> + Send {
        let url = self.completions_url();
        let api_key = self.api_key.clone();
        let organization = self.organization.clone();
        let default_model = self.model.clone();
        let http_client = self.client.clone();

        async move {
            let body = to_api_request(&request, &default_model);

            tracing::debug!(url = %url, model = %body["model"], "sending completion request");

            let mut builder = http_client
                .post(&url)
                .bearer_auth(&api_key)
                .header("content-type", "application/json");
            if let Some(org) = &organization {
                builder = builder.header("OpenAI-Organization", org);
            }

            let response = builder.json(&body).send().await.map_err(map_reqwest_error)?;

            let status = response.status();
            let response_text = response.text().await.map_err(map_reqwest_error)?;

            if !status.is_success() {
                return Err(map_http_status(status, &response_text));
            }

            let json: serde_json::Value = serde_json::from_str(&response_text)
                .map_err(|e| ProviderError::InvalidRequest(format!("invalid JSON response: {e}")))?;

            from_api_response(&json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_set() {
        let client = OpenAi::new("sk-test");
        assert_eq!(client.model, DEFAULT_MODEL);
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert!(client.organization.is_none());
    }

    #[test]
    fn completions_url_includes_path() {
        let client = OpenAi::new("k").base_url("http://localhost:9999");
        assert_eq!(client.completions_url(), "http://localhost:9999/v1/chat/completions");
    }
}
