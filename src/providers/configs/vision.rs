use std::time::Duration;

use super::base::{EnvConfig, EnvLookup};
use crate::errors::ConfigError;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct VisionProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub qa_endpoint: String,
    pub cache_ttl: Duration,
}

impl VisionProviderConfig {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let qa_endpoint = format!("{}/qa/chat", base_url);
        Self {
            base_url,
            api_key,
            qa_endpoint,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl EnvConfig for VisionProviderConfig {
    fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let base_url = Self::get_env(lookup, "BASE_URL", true, None)?
            .ok_or_else(|| ConfigError::Missing("BASE_URL".to_string()))?;
        let api_key = Self::get_env(lookup, "API_KEY", false, None)?;

        let mut config = Self::new(base_url, api_key);

        if let Some(endpoint) = Self::get_env(lookup, "REKA_VIDEO_QA_ENDPOINT", false, None)? {
            config.qa_endpoint = endpoint;
        }

        if let Some(ttl) = Self::get_env(lookup, "VIDEO_CACHE_TTL_SECS", false, None)? {
            let secs = ttl.parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "VIDEO_CACHE_TTL_SECS".to_string(),
                reason: e.to_string(),
            })?;
            config.cache_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
