//! Chat completion backend for the Groq API.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use reverb_core::{defaults, Error, GenerateRequest, GenerationBackend, Result};

use super::types::*;

/// Connection settings for [`GroqBackend`].
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API root, e.g. `https://api.groq.com/openai/v1`.
    pub base_url: String,
    /// Credential. `None` is a supported deployment mode: callers get the
    /// unavailable error and fall back instead of failing outright.
    pub api_key: Option<String>,
    /// Chat model identifier.
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GROQ_URL.to_string(),
            api_key: None,
            model: defaults::GEN_MODEL.to_string(),
            timeout_seconds: defaults::GEN_TIMEOUT_SECS,
        }
    }
}

/// HTTP client over the Groq chat completions endpoint.
pub struct GroqBackend {
    client: Client,
    config: GroqConfig,
}

impl GroqBackend {
    pub fn new(config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|err| Error::Inference(format!("could not build HTTP client: {err}")))?;

        debug!(
            subsystem = "inference",
            url = %config.base_url,
            model = %config.model,
            configured = config.api_key.is_some(),
            "initializing Groq backend"
        );

        Ok(Self { client, config })
    }

    /// Default settings, no credential.
    pub fn with_defaults() -> Result<Self> {
        Self::new(GroqConfig::default())
    }

    /// Read settings from `GROQ_BASE_URL`, `GROQ_API_KEY`, `GROQ_MODEL`,
    /// and `GROQ_TIMEOUT`.
    ///
    /// A blank `GROQ_API_KEY` counts as unset, so an empty line in an env
    /// file does not masquerade as a credential.
    pub fn from_env() -> Result<Self> {
        let config = GroqConfig {
            base_url: std::env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| defaults::GROQ_URL.to_string()),
            api_key: std::env::var("GROQ_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: std::env::var("GROQ_MODEL").unwrap_or_else(|_| defaults::GEN_MODEL.to_string()),
            timeout_seconds: std::env::var("GROQ_TIMEOUT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults::GEN_TIMEOUT_SECS),
        };

        Self::new(config)
    }

    pub fn config(&self) -> &GroqConfig {
        &self.config
    }

    /// POST builder for `endpoint`, with the bearer header when a key exists.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        match &self.config.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }
}

#[async_trait]
impl GenerationBackend for GroqBackend {
    async fn generate(&self, req: &GenerateRequest) -> Result<String> {
        // Guard before any I/O so an unconfigured backend stays silent.
        if !self.is_configured() {
            return Err(Error::InferenceUnavailable(
                "no API key configured".to_string(),
            ));
        }

        debug!(
            subsystem = "inference",
            model = %self.config.model,
            prompt_len = req.prompt.len(),
            json = req.json_response,
            "sending chat completion"
        );

        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: req.prompt.clone(),
            }],
            temperature: req.temperature,
            response_format: req.json_response.then(ResponseFormat::json_object),
        };

        let response = self
            .build_request("/chat/completions")
            .json(&body)
            .send()
            .await
            .map_err(|err| Error::Inference(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<GroqErrorResponse>()
                .await
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Inference(format!(
                "Groq returned {status}: {detail}"
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| Error::Inference(format!("malformed completion response: {err}")))?;

        let content = match parsed.choices.into_iter().next() {
            Some(choice) => choice.message.content,
            None => String::new(),
        };

        debug!(
            subsystem = "inference",
            response_len = content.len(),
            "chat completion received"
        );
        Ok(content)
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
