//! One-shot summarization client.

use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, MessageParam, MessagesRequest, MessagesResponse};
use crate::config::SummarizerConfig;
use crate::Error;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for the Anthropic Messages API, configured for single bounded
/// summarization requests.
pub struct Summarizer {
    client: Client,
    config: SummarizerConfig,
}

impl Summarizer {
    /// Create a new summarizer with the given configuration.
    pub fn new(config: SummarizerConfig) -> Result<Self, Error> {
        if config.api_key.is_empty() {
            return Err(Error::Configuration("api key is empty".to_string()));
        }
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Create a summarizer from environment variables.
    ///
    /// See [`SummarizerConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(SummarizerConfig::from_env()?)
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Produce a bounded-length summary for `prompt`.
    pub async fn summarize(&self, prompt: &str) -> Result<String, Error> {
        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            messages: vec![MessageParam::user(prompt)],
        };

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "Requesting summary");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.api_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response: MessagesResponse = response.json().await?;
        if let Some(usage) = &response.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Summary usage"
            );
        }

        let text = response
            .content
            .iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or(Error::EmptyResponse)?;

        info!(chars = text.len(), "Summary generated");
        Ok(text.to_string())
    }
}
