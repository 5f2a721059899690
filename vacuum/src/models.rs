//! Building [`Model`]s for the configured providers.

use crate::config::{ConfigError, HarnessConfig, ProviderSettings};
use std::fmt;
use std::str::FromStr;
use vacuum_provider::{Model, RetryingModel};
use vacuum_provider_anthropic::Anthropic;
use vacuum_provider_gemini::Gemini;
use vacuum_provider_openai::OpenAi;

/// The providers the harness can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Anthropic Messages API.
    Anthropic,
    /// OpenAI Chat Completions API.
    OpenAi,
    /// Google Gemini `generateContent` API.
    Gemini,
}

impl ProviderKind {
    /// Every provider, in run order.
    pub const ALL: [ProviderKind; 3] = [Self::Anthropic, Self::OpenAi, Self::Gemini];

    /// Name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }

    /// Variable holding the API key.
    pub fn key_var(&self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GOOGLE_API_KEY",
        }
    }

    /// This provider's settings in `config`.
    pub fn settings<'a>(&self, config: &'a HarnessConfig) -> &'a ProviderSettings {
        match self {
            Self::Anthropic => &config.anthropic,
            Self::OpenAi => &config.openai,
            Self::Gemini => &config.gemini,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" | "gpt4" | "gpt-4" => Ok(Self::OpenAi),
            "gemini" | "google" => Ok(Self::Gemini),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

/// Providers whose key is set.
pub fn available_providers(config: &HarnessConfig) -> Vec<ProviderKind> {
    ProviderKind::ALL
        .into_iter()
        .filter(|kind| kind.settings(config).api_key.is_some())
        .collect()
}

/// A retrying model for `kind`, configured from `config`.
///
/// Fails when the provider's key is not set.
pub fn build_model(kind: ProviderKind, config: &HarnessConfig) -> Result<Box<dyn Model>, ConfigError> {
    let settings = kind.settings(config);
    let key = settings
        .api_key
        .as_ref()
        .ok_or(ConfigError::MissingApiKey {
            provider: kind.name(),
            var: kind.key_var(),
        })?
        .expose();

    let model: Box<dyn Model> = match kind {
        ProviderKind::Anthropic => {
            let mut client = Anthropic::new(key);
            if let Some(model) = &settings.model {
                client = client.model(model);
            }
            if let Some(url) = &settings.base_url {
                client = client.base_url(url);
            }
            let id = client.default_model().to_string();
            Box::new(RetryingModel::new(client, config.model_config(id), config.retry))
        }
        ProviderKind::OpenAi => {
            let mut client = OpenAi::new(key);
            if let Some(model) = &settings.model {
                client = client.model(model);
            }
            if let Some(url) = &settings.base_url {
                client = client.base_url(url);
            }
            let id = client.default_model().to_string();
            Box::new(RetryingModel::new(client, config.model_config(id), config.retry))
        }
        ProviderKind::Gemini => {
            let mut client = Gemini::new(key);
            if let Some(model) = &settings.model {
                client = client.model(model);
            }
            if let Some(url) = &settings.base_url {
                client = client.base_url(url);
            }
            let id = client.default_model().to_string();
            Box::new(RetryingModel::new(client, config.model_config(id), config.retry))
        }
    };
    tracing::debug!(provider = %kind, model = model.name(), "model ready");
    Ok(model)
}
