//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `DOGMATCH_*` / `GEMINI_*` environment
//! variables. The Gemini API key has no default and is checked by [`Config::validate`].

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_BACKOFF_BASE, DEFAULT_EMBEDDING_DIM, DEFAULT_GEMINI_API_URL, DEFAULT_MAX_RETRIES,
    DEFAULT_MIX_LABEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
use crate::similarity::SimilarityWeights;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Gemini API key. Required.
    pub gemini_api_key: Option<String>,

    /// Gemini `generateContent` endpoint (without the `key` query parameter).
    pub gemini_api_url: String,

    /// Sampling temperature sent with every generation request. Default: `0.0`.
    pub temperature: f32,

    /// Per-call timeout for the generative-text endpoint. Default: 20s.
    pub request_timeout: Duration,

    /// Attempts made by the normalization pipeline before falling back. Default: `3`.
    pub max_retries: u32,

    /// Exponential backoff base in seconds (`base^attempt`). Default: `1.2`.
    pub backoff_base: f64,

    /// Default weights for the four cross-modal similarities.
    pub weights: SimilarityWeights,

    /// Embedding dimensionality produced by the embedding collaborator. Default: `512`.
    pub embedding_dim: usize,

    /// Label returned by the breed endpoint when no breed can be determined.
    pub mix_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            gemini_api_key: None,
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            weights: SimilarityWeights::default(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            mix_label: DEFAULT_MIX_LABEL.to_string(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "DOGMATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "DOGMATCH_BIND_ADDR";
    const ENV_API_KEY: &'static str = "GEMINI_API_KEY";
    const ENV_API_URL: &'static str = "GEMINI_API_URL";
    const ENV_TEMPERATURE: &'static str = "GEMINI_TEMPERATURE";
    const ENV_TIMEOUT_SECS: &'static str = "DOGMATCH_LLM_TIMEOUT_SECS";
    const ENV_MAX_RETRIES: &'static str = "DOGMATCH_LLM_MAX_RETRIES";
    const ENV_BACKOFF_BASE: &'static str = "DOGMATCH_LLM_BACKOFF_BASE";
    const ENV_W_II: &'static str = "DOGMATCH_W_II";
    const ENV_W_IT: &'static str = "DOGMATCH_W_IT";
    const ENV_W_TI: &'static str = "DOGMATCH_W_TI";
    const ENV_W_TT: &'static str = "DOGMATCH_W_TT";
    const ENV_EMBEDDING_DIM: &'static str = "DOGMATCH_EMBEDDING_DIM";
    const ENV_MIX_LABEL: &'static str = "DOGMATCH_MIX_LABEL";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let gemini_api_key = Self::parse_optional_string_from_env(Self::ENV_API_KEY);
        let gemini_api_url =
            Self::parse_string_from_env(Self::ENV_API_URL, defaults.gemini_api_url);
        let temperature = Self::parse_number_from_env(Self::ENV_TEMPERATURE, defaults.temperature)?;
        let timeout_secs = Self::parse_number_from_env(
            Self::ENV_TIMEOUT_SECS,
            defaults.request_timeout.as_secs_f64(),
        )?;
        let max_retries = Self::parse_number_from_env(Self::ENV_MAX_RETRIES, defaults.max_retries)?;
        let backoff_base =
            Self::parse_number_from_env(Self::ENV_BACKOFF_BASE, defaults.backoff_base)?;

        let weights = SimilarityWeights {
            image_image: Self::parse_number_from_env(Self::ENV_W_II, defaults.weights.image_image)?,
            image_text: Self::parse_number_from_env(Self::ENV_W_IT, defaults.weights.image_text)?,
            text_image: Self::parse_number_from_env(Self::ENV_W_TI, defaults.weights.text_image)?,
            text_text: Self::parse_number_from_env(Self::ENV_W_TT, defaults.weights.text_text)?,
        };

        let embedding_dim =
            Self::parse_number_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let mix_label = Self::parse_string_from_env(Self::ENV_MIX_LABEL, defaults.mix_label);

        if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_TIMEOUT_SECS,
                reason: format!("must be a positive number of seconds, got {timeout_secs}"),
            });
        }

        Ok(Self {
            port,
            bind_addr,
            gemini_api_key,
            gemini_api_url,
            temperature,
            request_timeout: Duration::from_secs_f64(timeout_secs),
            max_retries,
            backoff_base,
            weights,
            embedding_dim,
            mix_label,
        })
    }

    /// Validates credentials and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key().is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_API_KEY,
            });
        }

        if self.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_RETRIES,
                reason: "at least one attempt is required".to_string(),
            });
        }

        if !self.backoff_base.is_finite() || self.backoff_base < 1.0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_BACKOFF_BASE,
                reason: format!("must be >= 1.0, got {}", self.backoff_base),
            });
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_TEMPERATURE,
                reason: format!("must be between 0.0 and 2.0, got {}", self.temperature),
            });
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_DIM,
                reason: "must be greater than zero".to_string(),
            });
        }

        self.weights
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                name: "DOGMATCH_W_*",
                reason: e.to_string(),
            })?;

        Ok(())
    }

    /// Returns the API key if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_number_from_env<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::NumberParseError { name, value }),
            Err(_) => Ok(default),
        }
    }
}
