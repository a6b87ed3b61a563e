use std::env;

use crate::errors::ConfigError;

/// Source of environment values. `std::env::var` in production, a map in tests.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Result<String, env::VarError>;

pub trait EnvConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        Self::from_lookup(&|key: &str| env::var(key))
    }

    fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError>
    where
        Self: Sized;

    /// Helper function to get environment variables with error handling.
    /// Blank values count as unset.
    fn get_env(
        lookup: EnvLookup<'_>,
        key: &str,
        required: bool,
        default: Option<String>,
    ) -> Result<Option<String>, ConfigError> {
        match lookup(key) {
            Ok(value) if !value.trim().is_empty() => Ok(Some(value.trim().to_string())),
            Ok(_) | Err(env::VarError::NotPresent) if !required => Ok(default),
            Ok(_) | Err(env::VarError::NotPresent) => Err(ConfigError::Missing(key.to_string())),
            Err(e) => Err(ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
