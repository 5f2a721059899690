//! Gemini API client struct and builder.

use std::future::Future;

use vacuum_provider::{CompletionRequest, CompletionResponse, Provider, ProviderError};

use crate::error::{map_http_status, map_reqwest_error};
use crate::mapping::{from_api_response, to_api_request};

/// Default model used when none is specified on the request.
const DEFAULT_MODEL: &str = "gemini-pro";

/// Default Generative Language API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the Gemini `generateContent` API.
///
/// # Example
///
/// ```no_run
/// use vacuum_provider_gemini::Gemini;
///
/// let client = Gemini::new("AIza...").model("gemini-1.5-pro");
/// ```
pub struct Gemini {
    /// Google API key (`GOOGLE_API_KEY`).
    pub(crate) api_key: String,
    /// Default model identifier used when the request does not specify one.
    pub(crate) model: String,
    /// API base URL (override for testing or proxies).
    pub(crate) base_url: String,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl Gemini {
    /// Create a new client with the given API key.
    ///
    /// Default model: `gemini-pro`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
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

    /// The default model.
    pub fn default_model(&self) -> &str {
        &self.model
    }

    pub(crate) fn generate_url(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl Provider for Gemini {
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, ProviderError>> + Send {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };
        let url = self.generate_url(&model);
        let api_key = self.api_key.clone();
        let http_client = self.client.clone();

        async move {
            let body = to_api_request(&request);

            tracing::debug!(url = %url, model = %model, "sending completion request to Gemini");

            let response = http_client
                .post(&url)
                .header("x-goog-api-key", &api_key)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            let response_text = response.text().await.map_err(map_reqwest_error)?;

            if !status.is_success() {
                return Err(map_http_status(status, &response_text));
            }

            let json: serde_json::Value = serde_json::from_str(&response_text)
                .map_err(|e| ProviderError::InvalidRequest(format!("invalid JSON response: {e}")))?;

            from_api_response(&json, &model)
        }
    }
}
