//! Fact-check handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use crate::AppState;
use wikicheck_common::{
    config::AnalyzerMode,
    errors::{AppError, ErrorDetails, Result},
    models::FactCheckReport,
};

const MAX_CLAIM_CHARS: usize = 1000;
const MAX_BATCH_CLAIMS: usize = 10;

/// Single claim request
#[derive(Debug, Deserialize, Validate)]
pub struct FactCheckRequest {
    #[validate(length(min = 1, max = 1000))]
    pub claim: String,

    /// Documents to fetch (defaults to wikipedia.max_articles)
    #[validate(range(min = 1, max = 20))]
    pub max_articles: Option<usize>,

    /// keyword or llm (defaults to analyzer_mode)
    pub analyzer_mode: Option<AnalyzerMode>,
}

/// Batch request
#[derive(Debug, Deserialize, Validate)]
pub struct BatchFactCheckRequest {
    #[validate(length(min = 1, max = 10))]
    pub claims: Vec<String>,

    #[validate(range(min = 1, max = 20))]
    pub max_articles: Option<usize>,

    pub analyzer_mode: Option<AnalyzerMode>,
}

/// Batch response
#[derive(Serialize)]
pub struct BatchFactCheckResponse {
    pub results: Vec<BatchFactCheckItem>,
    pub processing_time_ms: u64,
}

/// One claim's outcome: a report or the error that stopped it
#[derive(Serialize)]
pub struct BatchFactCheckItem {
    pub claim: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<FactCheckReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

fn validation_error(err: validator::ValidationErrors) -> AppError {
    AppError::Validation {
        message: err.to_string(),
        field: None,
    }
}

fn ensure_claim(claim: &str) -> Result<()> {
    if claim.trim().is_empty() || claim.chars().count() > MAX_CLAIM_CHARS {
        return Err(AppError::Validation {
            message: format!("Each claim must be 1 to {} characters", MAX_CLAIM_CHARS),
            field: Some("claims".to_string()),
        });
    }
    Ok(())
}

/// Verify a single claim
pub async fn fact_check(
    State(state): State<AppState>,
    Json(request): Json<FactCheckRequest>,
) -> Result<Json<FactCheckReport>> {
    let start = Instant::now();

    request.validate().map_err(validation_error)?;
    ensure_claim(&request.claim).map_err(|_| AppError::Validation {
        message: "Claim must not be blank".to_string(),
        field: Some("claim".to_string()),
    })?;

    let result = tokio::time::timeout(
        state.config.request_timeout(),
        state
            .checker
            .run_fact_check(&request.claim, request.max_articles, request.analyzer_mode),
    )
    .await
    .map_err(|_| AppError::RetrievalTimeout)??;

    tracing::info!(
        claim = %request.claim,
        verdict = %result.verdict,
        sources = result.sources.len(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Fact check completed"
    );

    Ok(Json(FactCheckReport::new(request.claim, result)))
}

/// Verify up to ten claims, reporting each outcome in input order
pub async fn batch_fact_check(
    State(state): State<AppState>,
    Json(request): Json<BatchFactCheckRequest>,
) -> Result<Json<BatchFactCheckResponse>> {
    let start = Instant::now();

    if request.claims.len() > MAX_BATCH_CLAIMS {
        return Err(AppError::Validation {
            message: format!("Maximum {} claims per batch", MAX_BATCH_CLAIMS),
            field: Some("claims".to_string()),
        });
    }
    request.validate().map_err(validation_error)?;
    for claim in &request.claims {
        ensure_claim(claim)?;
    }

    let outcomes = tokio::time::timeout(
        state.config.request_timeout(),
        state
            .checker
            .run_batch(&request.claims, request.max_articles, request.analyzer_mode),
    )
    .await
    .map_err(|_| AppError::RetrievalTimeout)?;

    let results: Vec<BatchFactCheckItem> = request
        .claims
        .into_iter()
        .zip(outcomes)
        .map(|(claim, outcome)| match outcome {
            Ok(result) => BatchFactCheckItem {
                report: Some(FactCheckReport::new(claim.clone(), result)),
                error: None,
                claim,
            },
            Err(e) => BatchFactCheckItem {
                report: None,
                error: Some(ErrorDetails {
                    code: e.code(),
                    message: e.to_string(),
                    retryable: e.is_retryable(),
                }),
                claim,
            },
        })
        .collect();

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        claims = results.len(),
        failed = results.iter().filter(|r| r.error.is_some()).count(),
        latency_ms = processing_time_ms,
        "Batch fact check completed"
    );

    Ok(Json(BatchFactCheckResponse {
        results,
        processing_time_ms,
    }))
}
