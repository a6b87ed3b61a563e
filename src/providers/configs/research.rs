use super::base::{EnvConfig, EnvLookup};
use crate::errors::ConfigError;

pub const DEFAULT_HOST: &str = "https://api.reka.ai/v1";
pub const DEFAULT_MODEL: &str = "reka-flash-research";

#[derive(Debug, Clone)]
pub struct ResearchProviderConfig {
    pub api_key: String,
    pub host: String,
    pub model: String,
}

impl ResearchProviderConfig {
    pub fn new(api_key: String, host: String, model: String) -> Self {
        Self {
            api_key,
            host,
            model,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl EnvConfig for ResearchProviderConfig {
    fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let api_key = Self::get_env(lookup, "REKA_API_KEY", true, None)?
            .ok_or_else(|| ConfigError::Missing("REKA_API_KEY".to_string()))?;

        let host = Self::get_env(lookup, "REKA_API_HOST", false, None)?
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let model = Self::get_env(lookup, "REKA_MODEL", false, None)?
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, host, model))
    }
}
