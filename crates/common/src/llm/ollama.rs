//! Ollama chat backend

use super::{ChatMessage, LlmBackend};
use crate::config::LlmConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

pub struct OllamaBackend {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl OllamaBackend {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::AnalyzerUnavailable {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            model: config.ollama_model.clone(),
            base_url: config.ollama_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let request = OllamaChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)],
            stream: false,
            format: Some("json"),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AnalyzerUnavailable {
                message: format!("Failed to send request to Ollama: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AnalyzerUnavailable {
                message: format!("Ollama returned error {}: {}", status, body),
            });
        }

        let chat_response: OllamaChatResponse =
            response
                .json()
                .await
                .map_err(|e| AppError::MalformedAnalyzerResponse {
                    message: format!("Failed to parse Ollama response: {}", e),
                })?;

        Ok(chat_response.message.content.trim().to_string())
    }

    fn provider(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_non_streaming_json() {
        let request = OllamaChatRequest {
            model: "llama3.2",
            messages: vec![ChatMessage::user("hi")],
            stream: false,
            format: Some("json"),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stream"], false);
        assert_eq!(value["format"], "json");
        assert_eq!(value["model"], "llama3.2");
    }

    #[test]
    fn test_response_parses() {
        let body = r#"{"model":"llama3.2","message":{"role":"assistant","content":" {\"verdict\":\"TRUE\"} "},"done":true}"#;
        let parsed: OllamaChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.message.content.trim(), r#"{"verdict":"TRUE"}"#);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = LlmConfig {
            ollama_base_url: "http://localhost:11434/".to_string(),
            ..LlmConfig::default()
        };
        let backend = OllamaBackend::new(&config).unwrap();
        assert_eq!(backend.base_url, "http://localhost:11434");
    }
}
