//! Configuration management for WikiCheck
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local; TOML or YAML)
//! - Default values
//!
//! The loaded value is passed explicitly into every component constructor.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Wikipedia API configuration
    #[serde(default)]
    pub wikipedia: WikipediaConfig,

    /// Evidence extraction and classification
    #[serde(default)]
    pub fact_check: FactCheckConfig,

    /// Which analyzer drives the verdict
    #[serde(default)]
    pub analyzer_mode: AnalyzerMode,

    /// Semantic analyzer backend
    #[serde(default)]
    pub llm: LlmConfig,

    /// Result export
    #[serde(default)]
    pub export: ExportConfig,

    /// Run history
    #[serde(default)]
    pub history: HistoryConfig,

    /// HTTP gateway
    #[serde(default)]
    pub server: ServerConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Inbound rate limiting (gateway)
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WikipediaConfig {
    /// MediaWiki action API endpoint
    #[serde(default = "default_wikipedia_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_wikipedia_timeout")]
    pub timeout_seconds: u64,

    /// Documents to fetch per claim
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Client-side request budget
    #[serde(default = "default_wikipedia_rps")]
    pub requests_per_second: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FactCheckConfig {
    /// Maximum relevant sentences kept per document
    #[serde(default = "default_max_evidence_sentences")]
    pub max_evidence_sentences: usize,

    /// Keyword length threshold
    #[serde(default = "default_min_keyword_length")]
    pub min_keyword_length: usize,

    /// Concurrent document fetches per claim
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

/// Analyzer selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerMode {
    /// Keyword/negation heuristic
    #[default]
    #[serde(alias = "heuristic")]
    Keyword,
    /// External language-model backend
    #[serde(alias = "semantic")]
    Llm,
}

impl AnalyzerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerMode::Keyword => "keyword",
            AnalyzerMode::Llm => "llm",
        }
    }
}

impl fmt::Display for AnalyzerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyzerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyword" | "heuristic" => Ok(AnalyzerMode::Keyword),
            "llm" | "semantic" => Ok(AnalyzerMode::Llm),
            other => Err(format!("unknown analyzer mode: {other} (expected keyword or llm)")),
        }
    }
}

/// Semantic analyzer provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Ollama,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Ollama => "ollama",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Backend provider: openai, ollama
    #[serde(default)]
    pub provider: LlmProvider,

    /// OpenAI chat model
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Ollama chat model
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,

    /// OpenAI API key (falls back to OPENAI_API_KEY)
    #[serde(default, skip_serializing)]
    pub openai_api_key: Option<String>,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Ollama server URL
    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,

    /// Report backend confidence (otherwise forced to 0)
    #[serde(default = "default_enabled")]
    pub confidence_enabled: bool,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

impl LlmConfig {
    /// Model name for the configured provider
    pub fn model(&self) -> &str {
        match self.provider {
            LlmProvider::OpenAi => &self.openai_model,
            LlmProvider::Ollama => &self.ollama_model,
        }
    }

    /// API key from configuration or the OPENAI_API_KEY environment variable
    pub fn resolve_openai_api_key(&self) -> Option<String> {
        self.openai_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Output directory for exported files
    #[serde(default = "default_export_directory")]
    pub directory: String,

    /// json or csv
    #[serde(default = "default_export_format")]
    pub default_format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// JSON file holding past reports
    #[serde(default = "default_history_path")]
    pub path: String,

    /// Entries shown by default
    #[serde(default = "default_history_display_limit")]
    pub display_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default)]
    pub metrics_port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests per second
    #[serde(default = "default_rate_limit")]
    pub requests_per_second: u32,

    /// Burst capacity
    #[serde(default = "default_burst")]
    pub burst: u32,

    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

// Default value functions
fn default_wikipedia_base_url() -> String { "https://en.wikipedia.org/w/api.php".to_string() }
fn default_wikipedia_timeout() -> u64 { 10 }
fn default_max_articles() -> usize { 5 }
fn default_user_agent() -> String { format!("WikiCheck/{} (https://github.com/wikicheck/wikicheck)", crate::VERSION) }
fn default_wikipedia_rps() -> u32 { 10 }
fn default_max_evidence_sentences() -> usize { 10 }
fn default_min_keyword_length() -> usize { 3 }
fn default_fetch_concurrency() -> usize { 4 }
fn default_openai_model() -> String { "gpt-4o-mini".to_string() }
fn default_ollama_model() -> String { "llama3.2".to_string() }
fn default_openai_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_ollama_base_url() -> String { "http://127.0.0.1:11434".to_string() }
fn default_llm_timeout() -> u64 { 60 }
fn default_export_directory() -> String { "exports".to_string() }
fn default_export_format() -> String { "json".to_string() }
fn default_history_path() -> String { "history.json".to_string() }
fn default_history_display_limit() -> usize { 20 }
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 120 }
fn default_log_level() -> String { "info".to_string() }
fn default_rate_limit() -> u32 { 5 }
fn default_burst() -> u32 { 10 }
fn default_enabled() -> bool { true }

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_wikipedia_base_url(),
            timeout_seconds: default_wikipedia_timeout(),
            max_articles: default_max_articles(),
            user_agent: default_user_agent(),
            requests_per_second: default_wikipedia_rps(),
        }
    }
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            max_evidence_sentences: default_max_evidence_sentences(),
            min_keyword_length: default_min_keyword_length(),
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            openai_model: default_openai_model(),
            ollama_model: default_ollama_model(),
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            ollama_base_url: default_ollama_base_url(),
            confidence_enabled: default_enabled(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            default_format: default_export_format(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            display_limit: default_history_display_limit(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: false,
            metrics_port: 0,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_rate_limit(),
            burst: default_burst(),
            enabled: default_enabled(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__WIKIPEDIA__MAX_ARTICLES=3
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML or YAML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Gateway request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wikipedia: WikipediaConfig::default(),
            fact_check: FactCheckConfig::default(),
            analyzer_mode: AnalyzerMode::default(),
            llm: LlmConfig::default(),
            export: ExportConfig::default(),
            history: HistoryConfig::default(),
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}
