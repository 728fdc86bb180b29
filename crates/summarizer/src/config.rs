//! Configuration for the summarizer.

use std::env;

use crate::Error;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 600;

/// Configuration for the Anthropic Messages API client.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for the summary.
    pub max_tokens: u32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl SummarizerConfig {
    /// Configuration with an explicit API key and defaults for the rest.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `ANTHROPIC_API_KEY` - API key for authentication
    ///
    /// Optional (with defaults):
    /// - `ANTHROPIC_API_URL` - API base URL
    /// - `ANTHROPIC_MODEL` - Model name
    /// - `ANTHROPIC_MAX_TOKENS` - Max tokens for the summary
    pub fn from_env() -> Result<Self, Error> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| Error::Configuration("ANTHROPIC_API_KEY not set".to_string()))?;

        let api_url =
            env::var("ANTHROPIC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = env::var("ANTHROPIC_MAX_TOKENS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        Ok(Self {
            api_url,
            api_key,
            model,
            max_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SummarizerConfig::default();

        assert_eq!(config.api_url, "https://api.anthropic.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 600);
    }

    #[test]
    fn test_new_sets_key_only() {
        let config = SummarizerConfig::new("test-key");

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    // Environment-based scenarios share one test to avoid races between
    // parallel tests over process-global env vars.
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_vars() {
            env::remove_var("ANTHROPIC_API_KEY");
            env::remove_var("ANTHROPIC_API_URL");
            env::remove_var("ANTHROPIC_MODEL");
            env::remove_var("ANTHROPIC_MAX_TOKENS");
        }

        // Missing API key should error.
        clear_all_vars();
        let result = SummarizerConfig::from_env();
        match result {
            Err(Error::Configuration(msg)) => assert!(msg.contains("ANTHROPIC_API_KEY")),
            _ => panic!("Expected Configuration error"),
        }

        // Only the API key set, defaults used.
        clear_all_vars();
        env::set_var("ANTHROPIC_API_KEY", "env-key");
        let config = SummarizerConfig::from_env().unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);

        // All vars set.
        clear_all_vars();
        env::set_var("ANTHROPIC_API_KEY", "env-key");
        env::set_var("ANTHROPIC_API_URL", "https://proxy.example");
        env::set_var("ANTHROPIC_MODEL", "claude-test");
        env::set_var("ANTHROPIC_MAX_TOKENS", "900");
        let config = SummarizerConfig::from_env().unwrap();
        assert_eq!(config.api_url, "https://proxy.example");
        assert_eq!(config.model, "claude-test");
        assert_eq!(config.max_tokens, 900);

        clear_all_vars();
    }
}
