//! Mock generation backend for deterministic testing.
//!
//! Downstream crates enable the `mock` feature in dev-dependencies to
//! drive enrichment and report flows without a network or credential.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reverb_inference::mock::MockGenerationBackend;
//!
//! let backend = MockGenerationBackend::new()
//!     .with_fixed_response(r#"{"summary": "ok"}"#);
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use reverb_core::{Error, GenerateRequest, GenerationBackend, Result};

/// Mock generation backend with canned responses and a call log.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<GenerateRequest>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    configured: bool,
    default_response: String,
    /// Substring of the prompt -> canned reply, checked in insertion order.
    mappings: Vec<(String, String)>,
    fail: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            configured: true,
            default_response: "Mock response".to_string(),
            mappings: Vec::new(),
            fail: false,
        }
    }
}

impl MockGenerationBackend {
    /// Create a new configured mock backend.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a backend that behaves like a deployment with no API key.
    pub fn unconfigured() -> Self {
        let mut backend = Self::new();
        Arc::make_mut(&mut backend.config).configured = false;
        backend
    }

    /// Set the response returned when no mapping matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Add a canned reply for prompts containing the given substring.
    pub fn with_response_mapping(
        mut self,
        prompt_contains: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .mappings
            .push((prompt_contains.into(), response.into()));
        self
    }

    /// Make every generation call fail.
    pub fn with_failure(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail = true;
        self
    }

    /// Get all logged requests for assertion.
    pub fn calls(&self) -> Vec<GenerateRequest> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    /// Get the number of generation calls made.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, req: &GenerateRequest) -> Result<String> {
        self.call_log.lock().unwrap().push(req.clone());

        if !self.config.configured {
            return Err(Error::InferenceUnavailable(
                "no API key configured".to_string(),
            ));
        }

        if self.config.fail {
            return Err(Error::Inference("simulated failure".to_string()));
        }

        for (needle, response) in &self.config.mappings {
            if req.prompt.contains(needle) {
                return Ok(response.clone());
            }
        }

        Ok(self.config.default_response.clone())
    }

    fn is_configured(&self) -> bool {
        self.config.configured
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_default_response() {
        let backend = MockGenerationBackend::new();

        let response = backend
            .generate(&GenerateRequest::text("anything"))
            .await
            .unwrap();
        assert_eq!(response, "Mock response");
    }

    #[tokio::test]
    async fn test_mock_backend_fixed_response() {
        let backend = MockGenerationBackend::new().with_fixed_response("Custom response");

        let response = backend
            .generate(&GenerateRequest::text("test prompt"))
            .await
            .unwrap();
        assert_eq!(response, "Custom response");
    }

    #[tokio::test]
    async fn test_mock_backend_response_mapping() {
        let backend = MockGenerationBackend::new()
            .with_response_mapping("weather", "sunny")
            .with_response_mapping("food", "pizza");

        let r1 = backend
            .generate(&GenerateRequest::text("what is the weather like"))
            .await
            .unwrap();
        let r2 = backend
            .generate(&GenerateRequest::text("recommend some food"))
            .await
            .unwrap();

        assert_eq!(r1, "sunny");
        assert_eq!(r2, "pizza");
    }

    #[tokio::test]
    async fn test_mock_backend_first_mapping_wins() {
        let backend = MockGenerationBackend::new()
            .with_response_mapping("review", "first")
            .with_response_mapping("review", "second");

        let response = backend
            .generate(&GenerateRequest::text("analyze this review"))
            .await
            .unwrap();
        assert_eq!(response, "first");
    }

    #[tokio::test]
    async fn test_mock_backend_unconfigured() {
        let backend = MockGenerationBackend::unconfigured();
        assert!(!backend.is_configured());

        let err = backend
            .generate(&GenerateRequest::text("test"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InferenceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_mock_backend_failure() {
        let backend = MockGenerationBackend::new().with_failure();
        assert!(backend.is_configured());

        let err = backend
            .generate(&GenerateRequest::text("test"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn test_mock_backend_call_logging() {
        let backend = MockGenerationBackend::new();

        backend
            .generate(&GenerateRequest::json("first").with_temperature(0.5))
            .await
            .unwrap();
        backend
            .generate(&GenerateRequest::text("second"))
            .await
            .unwrap();

        assert_eq!(backend.call_count(), 2);

        let calls = backend.calls();
        assert_eq!(calls[0].prompt, "first");
        assert!(calls[0].json_response);
        assert_eq!(calls[0].temperature, Some(0.5));
        assert_eq!(calls[1].prompt, "second");
        assert!(!calls[1].json_response);

        backend.clear_calls();
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_backend_clone_shares_call_log() {
        let backend = MockGenerationBackend::new();
        let clone = backend.clone();

        clone
            .generate(&GenerateRequest::text("via clone"))
            .await
            .unwrap();
        assert_eq!(backend.call_count(), 1);
    }
}
