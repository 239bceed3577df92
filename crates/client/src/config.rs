//! Environment-based client configuration.

/// Environment variable naming the registration server's base URL.
pub const ENV_BASE_URL: &str = "ALERTSYNC_BASE_URL";
/// Environment variable carrying an optional bearer token.
pub const ENV_AUTH_TOKEN: &str = "ALERTSYNC_AUTH_TOKEN";

/// Resolved connection settings for [`crate::http::HttpRegistrationApi`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `https://api.example.edu/api/alert`.
    pub base_url: String,
    /// Bearer token, if the deployment requires one.
    pub auth_token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Read configuration from the environment.
    ///
    /// `ALERTSYNC_BASE_URL` is required; `ALERTSYNC_AUTH_TOKEN` is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            std::env::var(ENV_BASE_URL).map_err(|_| ConfigError::MissingVar(ENV_BASE_URL))?;

        let mut config = Self::new(base_url);
        if let Ok(token) = std::env::var(ENV_AUTH_TOKEN) {
            if !token.is_empty() {
                config = config.with_auth_token(token);
            }
        }
        Ok(config)
    }
}

/// Errors raised while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}
