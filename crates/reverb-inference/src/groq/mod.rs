//! Groq (OpenAI-compatible) generation backend.
//!
//! This module talks to any endpoint implementing the OpenAI chat
//! completions wire format. Groq is the default target, but the base URL
//! is configurable, so the same backend works against:
//!
//! - Groq cloud API (default)
//! - OpenAI cloud API
//! - Ollama (in OpenAI compatibility mode)
//! - vLLM
//!
//! # Example
//!
//! ```rust,no_run
//! use reverb_inference::groq::{GroqBackend, GroqConfig};
//! use reverb_core::{GenerateRequest, GenerationBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     // From environment variables (GROQ_API_KEY et al.)
//!     let backend = GroqBackend::from_env().unwrap();
//!
//!     // Or with custom config
//!     let config = GroqConfig {
//!         base_url: "http://localhost:11434/v1".to_string(), // Ollama
//!         api_key: Some("key".to_string()),
//!         model: "llama3".to_string(),
//!         timeout_seconds: 120,
//!     };
//!     let backend = GroqBackend::new(config).unwrap();
//!
//!     let reply = backend
//!         .generate(&GenerateRequest::text("Say hello"))
//!         .await
//!         .unwrap();
//!     println!("{reply}");
//! }
//! ```

mod backend;
mod types;

pub use backend::{GroqBackend, GroqConfig};
pub use types::*;
