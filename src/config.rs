use std::time::Duration;

/// Default Last.fm JSON API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Environment variable holding the Last.fm API key.
pub const API_KEY_ENV_VAR: &str = "LASTFM_API_KEY";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client configuration.
///
/// Configuration is read once, usually at startup via [`ClientConfig::from_env`];
/// the client never re-reads the environment afterwards.
///
/// # Examples
///
/// ```rust
/// use melody_scope::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_api_key("0123456789abcdef")
///     .with_timeout(Duration::from_secs(5));
///
/// assert!(config.has_api_key());
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Last.fm API key; every network operation fails without one
    pub api_key: Option<String>,
    /// Endpoint all methods are called against
    pub base_url: String,
    /// Upper bound for a single request, including reading the body
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create a config with default settings and no API key
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config with the API key taken from `LASTFM_API_KEY`
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV_VAR).ok();
        Self::default().with_optional_api_key(api_key)
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set or clear the API key
    pub fn with_optional_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Set custom endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set custom request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new();
        assert_eq!(config.base_url, "https://ws.audioscrobbler.com/2.0/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = ClientConfig::new().with_api_key("   ");
        assert_eq!(config.api_key(), None);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new()
            .with_api_key("key")
            .with_base_url("http://localhost:8080/2.0/")
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.api_key(), Some("key"));
        assert_eq!(config.base_url, "http://localhost:8080/2.0/");
        assert_eq!(config.timeout, Duration::from_millis(250));
    }
}
