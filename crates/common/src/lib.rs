//! WikiCheck Common Library
//!
//! Shared code for the WikiCheck gateway and CLI including:
//! - Claim verification pipeline (retrieval, extraction, analysis)
//! - Heuristic and language-model analyzers
//! - Wikipedia retrieval client
//! - Error types and handling
//! - Configuration management
//! - Export and history persistence
//! - Metrics and observability

pub mod analyzer;
pub mod checker;
pub mod config;
pub mod errors;
pub mod evidence;
pub mod export;
pub mod history;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod retriever;

// Re-export commonly used types
pub use analyzer::EvidenceAnalyzer;
pub use checker::FactChecker;
pub use config::{AnalyzerMode, AppConfig};
pub use errors::{AppError, Result};
pub use models::{AnalysisResult, FactCheckReport, Source, Verdict};
pub use retriever::{Retriever, WikipediaClient};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
