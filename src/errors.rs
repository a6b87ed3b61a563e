use thiserror::Error;

/// Raised while assembling configuration, before any request goes out.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set.")]
    Missing(String),

    #[error("Environment variable '{key}' is invalid: {reason}")]
    Invalid { key: String, reason: String },

    #[error("API key not configured")]
    MissingApiKey,
}

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Transport(err)
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::Missing("REKA_API_KEY".to_string()).to_string(),
            "Environment variable 'REKA_API_KEY' is required but not set."
        );
        assert_eq!(ConfigError::MissingApiKey.to_string(), "API key not configured");
    }

    #[test]
    fn test_config_error_is_transparent_in_client_error() {
        let err: ClientError = ConfigError::MissingApiKey.into();
        assert_eq!(err.to_string(), "API key not configured");
    }

    #[test]
    fn test_api_error_message() {
        let err = ClientError::Api {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 429): rate limited");
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        let err = ClientError::from(err);
        assert!(matches!(err, ClientError::Transport(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Request failed: "));
    }
}
