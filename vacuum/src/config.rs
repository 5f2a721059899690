//! Harness configuration, read once from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `RANDOM_SEED` | 42 |
//! | `TRAINING_SET_SIZE` / `TEST_SET_SIZE` | 20 / 20 |
//! | `SEQUENCE_LENGTH` | 3 |
//! | `SYMBOL_RANGES` | `name:START-END;...`, the three default ranges |
//! | `MAX_RETRIES` | 3 |
//! | `RATE_LIMIT_DELAY` | 1.0 seconds |
//! | `MODEL_TEMPERATURE` / `MAX_TOKENS` | 0.0 / 150 |
//! | `ALPHA` | 0.05 |
//! | `RESULTS_DIR` | `data/results` |
//! | `ANTHROPIC_API_KEY`, `OPENAI_API_KEY`, `GOOGLE_API_KEY` | unset |
//! | `CLAUDE_MODEL`, `GPT4_MODEL`, `GEMINI_MODEL` | provider default |
//! | `ANTHROPIC_BASE_URL`, `OPENAI_BASE_URL`, `GEMINI_BASE_URL` | provider default |
//!
//! Empty values count as unset.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use vacuum_provider::{ModelConfig, RetryPolicy};
use vacuum_stimuli::{ExperimentConfig, StimulusError};
use vacuum_symbols::{PoolConfig, SymbolError};

/// Errors from reading or validating configuration.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set to something unparseable.
    #[error("{var}: cannot parse '{value}': {reason}")]
    Parse {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// Symbol ranges are unusable.
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    /// Condition parameters are unusable.
    #[error(transparent)]
    Stimulus(#[from] StimulusError),

    /// A provider was selected without its key.
    #[error("{provider} selected but {var} is not set")]
    MissingApiKey {
        /// Provider name.
        provider: &'static str,
        /// Variable that should hold the key.
        var: &'static str,
    },

    /// A provider name nobody knows.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// An API key. Never printed.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key itself, for the HTTP client.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Key, model and endpoint for one provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// API key, when set.
    pub api_key: Option<ApiKey>,
    /// Model id; the client's default when unset.
    pub model: Option<String>,
    /// Endpoint override.
    pub base_url: Option<String>,
}

/// Everything a run needs, validated once at startup.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Seed, symbol ranges and per-condition parameters.
    pub experiment: ExperimentConfig,
    /// Attempts, backoff base and pacing.
    pub retry: RetryPolicy,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Significance level.
    pub alpha: f64,
    /// Root of the result store.
    pub results_dir: PathBuf,
    /// Anthropic settings.
    pub anthropic: ProviderSettings,
    /// OpenAI settings.
    pub openai: ProviderSettings,
    /// Google Gemini settings.
    pub gemini: ProviderSettings,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            experiment: ExperimentConfig::default(),
            retry: RetryPolicy::default(),
            max_tokens: 150,
            temperature: 0.0,
            alpha: 0.05,
            results_dir: PathBuf::from("data/results"),
            anthropic: ProviderSettings::default(),
            openai: ProviderSettings::default(),
            gemini: ProviderSettings::default(),
        }
    }
}

impl HarnessConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read variables through `lookup`, then validate.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        let experiment = &mut config.experiment;
        experiment.seed = parse(&get, "RANDOM_SEED", experiment.seed)?;
        if let Some(ranges) = get("SYMBOL_RANGES") {
            experiment.pool = PoolConfig::parse_list(&ranges)?;
        }

        let n_training = parse(&get, "TRAINING_SET_SIZE", experiment.plain.n_training)?;
        let n_test = parse(&get, "TEST_SET_SIZE", experiment.plain.n_test)?;
        let length = parse(&get, "SEQUENCE_LENGTH", experiment.plain.sequence_length)?;
        for params in [&mut experiment.plain, &mut experiment.familiar] {
            params.n_training = n_training;
            params.n_test = n_test;
        }
        experiment.minimal.n_test = n_test;
        for params in [
            &mut experiment.plain,
            &mut experiment.minimal,
            &mut experiment.familiar,
        ] {
            params.sequence_length = length;
        }
        experiment.ambiguous.sequence_length = length;
        experiment.transfer.sequence_length = length;
        experiment.scaling.training_length = length;

        config.retry.max_attempts = parse(&get, "MAX_RETRIES", config.retry.max_attempts)?;
        let delay: f64 = parse(&get, "RATE_LIMIT_DELAY", config.retry.base_delay.as_secs_f64())?;
        let delay = Duration::try_from_secs_f64(delay).map_err(|e| ConfigError::Parse {
            var: "RATE_LIMIT_DELAY",
            value: delay.to_string(),
            reason: e.to_string(),
        })?;
        config.retry.base_delay = delay;
        config.retry.request_delay = delay;

        config.temperature = parse(&get, "MODEL_TEMPERATURE", config.temperature)?;
        config.max_tokens = parse(&get, "MAX_TOKENS", config.max_tokens)?;
        config.alpha = parse(&get, "ALPHA", config.alpha)?;
        if let Some(dir) = get("RESULTS_DIR") {
            config.results_dir = PathBuf::from(dir);
        }

        config.anthropic = provider_settings(&get, "ANTHROPIC_API_KEY", "CLAUDE_MODEL", "ANTHROPIC_BASE_URL");
        config.openai = provider_settings(&get, "OPENAI_API_KEY", "GPT4_MODEL", "OPENAI_BASE_URL");
        config.gemini = provider_settings(&get, "GOOGLE_API_KEY", "GEMINI_MODEL", "GEMINI_BASE_URL");

        config.validate()?;
        tracing::debug!(
            seed = config.experiment.seed,
            results_dir = %config.results_dir.display(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Check every value once. Keys are checked later, per selected provider.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "ALPHA must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.retry.max_attempts < 1 {
            return Err(ConfigError::Invalid("MAX_RETRIES must be at least 1".into()));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "MODEL_TEMPERATURE must be finite and non-negative, got {}",
                self.temperature
            )));
        }
        if self.max_tokens < 1 {
            return Err(ConfigError::Invalid("MAX_TOKENS must be at least 1".into()));
        }

        self.experiment.validate()?;

        let plain = &self.experiment.plain;
        let required = plain.required_symbols();
        let pool_size = self.experiment.pool.size();
        if required > pool_size {
            return Err(ConfigError::Invalid(format!(
                "({} training + {} test) x length {} = {required} symbols, but the pool holds {pool_size}",
                plain.n_training, plain.n_test, plain.sequence_length
            )));
        }
        Ok(())
    }

    /// Sampling settings for `model`.
    pub fn model_config(&self, model: impl Into<String>) -> ModelConfig {
        ModelConfig {
            model: model.into(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

fn parse<G, T>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Parse {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

fn provider_settings<G>(get: &G, key_var: &str, model_var: &str, url_var: &str) -> ProviderSettings
where
    G: Fn(&str) -> Option<String>,
{
    ProviderSettings {
        api_key: get(key_var).map(ApiKey::new),
        model: get(model_var),
        base_url: get(url_var),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<HarnessConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HarnessConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.experiment.seed, 42);
        assert_eq!(config.experiment.plain.n_training, 20);
        assert_eq!(config.experiment.pool.size(), 184);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.request_delay, Duration::from_secs(1));
        assert_eq!(config.max_tokens, 150);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.alpha, 0.05);
        assert_eq!(config.results_dir, PathBuf::from("data/results"));
        assert!(config.anthropic.api_key.is_none());
    }

    #[test]
    fn variables_override_defaults() {
        let config = load(&[
            ("RANDOM_SEED", "7"),
            ("TRAINING_SET_SIZE", "10"),
            ("TEST_SET_SIZE", "5"),
            ("SEQUENCE_LENGTH", "4"),
            ("MAX_RETRIES", "5"),
            ("RATE_LIMIT_DELAY", "0.25"),
            ("MODEL_TEMPERATURE", "0.7"),
            ("ALPHA", "0.01"),
            ("RESULTS_DIR", "/tmp/out"),
            ("CLAUDE_MODEL", "claude-3-opus-20240229"),
            ("OPENAI_API_KEY", "sk-test"),
        ])
        .unwrap();
        assert_eq!(config.experiment.seed, 7);
        assert_eq!(config.experiment.plain.n_training, 10);
        assert_eq!(config.experiment.plain.n_test, 5);
        assert_eq!(config.experiment.plain.sequence_length, 4);
        assert_eq!(config.experiment.ambiguous.sequence_length, 4);
        assert_eq!(config.experiment.minimal.n_training, 3);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay, Duration::from_millis(250));
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.results_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.anthropic.model.as_deref(), Some("claude-3-opus-20240229"));
        assert_eq!(config.openai.api_key.as_ref().map(ApiKey::expose), Some("sk-test"));
    }

    #[test]
    fn symbol_ranges_are_parsed() {
        let config = load(&[("SYMBOL_RANGES", "ops:2A00-2A7F;arrows:2190-21FF")]).unwrap();
        assert_eq!(config.experiment.pool.ranges.len(), 2);
        assert_eq!(config.experiment.pool.size(), 128 + 112);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            load(&[("ALPHA", "1.5")]),
            Err(ConfigError::Invalid(m)) if m.contains("ALPHA")
        ));
        assert!(matches!(
            load(&[("ALPHA", "zero")]),
            Err(ConfigError::Parse { var: "ALPHA", .. })
        ));
        assert!(matches!(load(&[("MAX_RETRIES", "0")]), Err(ConfigError::Invalid(_))));
        assert!(matches!(
            load(&[("MODEL_TEMPERATURE", "-1")]),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            load(&[("MODEL_TEMPERATURE", "NaN")]),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            load(&[("RATE_LIMIT_DELAY", "-2")]),
            Err(ConfigError::Parse { var: "RATE_LIMIT_DELAY", .. })
        ));
        assert!(matches!(load(&[("TEST_SET_SIZE", "0")]), Err(ConfigError::Stimulus(_))));
        assert!(matches!(
            load(&[("SYMBOL_RANGES", "bad")]),
            Err(ConfigError::Symbol(_))
        ));
    }

    #[test]
    fn pool_must_cover_training_and_test() {
        let err = load(&[("TRAINING_SET_SIZE", "50"), ("TEST_SET_SIZE", "50")]).unwrap_err();
        assert!(err.to_string().contains("300 symbols"), "{err}");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[("RANDOM_SEED", "  "), ("ANTHROPIC_API_KEY", "")]).unwrap();
        assert_eq!(config.experiment.seed, 42);
        assert!(config.anthropic.api_key.is_none());
    }

    #[test]
    fn api_keys_never_print() {
        let config = load(&[("ANTHROPIC_API_KEY", "sk-ant-secret")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
