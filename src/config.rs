// Client configuration for the tour backend
// The only deployment surface is the backend location plus a few shaping knobs.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::ConfigError(err.to_string())
    }
}

// How country code and phone number leave the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneShaping {
    // `countryCode` and `phone` as two fields
    #[default]
    Separate,
    // a single `phone` field with the dialing code prepended
    Combined,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_prefix: String,
    #[serde(default)]
    pub phone_shaping: PhoneShaping,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

pub const ENV_PREFIX: &str = "TOUR";

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self {
            base_url: base_url.into(),
            api_prefix: String::new(),
            phone_shaping: PhoneShaping::default(),
            timeout_ms: None,
        }
        .normalized()
    }

    /// Reads `TOUR_BASE_URL`, `TOUR_API_PREFIX`, `TOUR_PHONE_SHAPING` and
    /// `TOUR_TIMEOUT_MS` from the process environment.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    pub fn load(source: config::Environment) -> Result<Self, ClientError> {
        let settings = config::Config::builder()
            .add_source(source.try_parsing(true))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.normalized()
    }

    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into().trim_matches('/').to_string();
        self
    }

    pub fn with_phone_shaping(mut self, shaping: PhoneShaping) -> Self {
        self.phone_shaping = shaping;
        self
    }

    // Endpoint URL: {base}[/{prefix}]/{path}
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.api_prefix.is_empty() {
            format!("{}/{}", self.base_url, path)
        } else {
            format!("{}/{}/{}", self.base_url, self.api_prefix, path)
        }
    }

    fn normalized(mut self) -> Result<Self, ClientError> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            return Err(ClientError::ConfigError("base_url is empty".to_string()));
        }

        let parsed = reqwest::Url::parse(&trimmed)
            .map_err(|e| ClientError::ConfigError(format!("invalid base_url '{}': {}", trimmed, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::ConfigError(format!(
                "base_url must be http or https, got '{}'",
                parsed.scheme()
            )));
        }

        self.base_url = trimmed;
        self.api_prefix = self.api_prefix.trim_matches('/').to_string();
        Ok(self)
    }
}
