//! Chat backend abstraction for the semantic analyzer
//!
//! Provides a unified interface for:
//! - OpenAI-compatible chat completions
//! - Ollama local models

mod ollama;
mod openai;

pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

use crate::config::{LlmConfig, LlmProvider};
use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Single-turn chat exchange with a reasoning backend
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Send a system instruction and user payload, return the assistant text
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Provider name for logs and metrics
    fn provider(&self) -> &str;

    /// Model name
    fn model(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub(crate) fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub(crate) fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Create a backend based on configuration
pub fn create_backend(config: &LlmConfig) -> Result<Arc<dyn LlmBackend>> {
    let backend: Arc<dyn LlmBackend> = match config.provider {
        LlmProvider::OpenAi => Arc::new(OpenAiBackend::new(config)?),
        LlmProvider::Ollama => Arc::new(OllamaBackend::new(config)?),
    };
    tracing::debug!(
        provider = backend.provider(),
        model = backend.model(),
        "LLM backend created"
    );
    Ok(backend)
}
