use super::Retriever;
use crate::config::WikipediaConfig;
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::models::SearchHit;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::StatusCode;
use serde_json::Value;
use std::num::NonZeroU32;
use tracing::{debug, info, warn};

const PAGE_URL_PREFIX: &str = "https://en.wikipedia.org/?curid=";

/// MediaWiki action API client
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl WikipediaClient {
    pub fn new(config: &WikipediaConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| AppError::Configuration {
                message: format!("Invalid wikipedia.user_agent: {}", e),
            })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        let rps = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            limiter: RateLimiter::direct(Quota::per_second(rps)),
        })
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<Value> {
        self.limiter.until_ready().await;

        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Wikipedia API rate limit (429)");
            return Err(AppError::RetrievalRateLimited);
        }
        if !status.is_success() {
            return Err(AppError::RetrievalTransient {
                message: format!("Wikipedia API returned {}", status),
            });
        }

        response.json().await.map_err(transport_error)
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::RetrievalTimeout
    } else {
        AppError::RetrievalTransient {
            message: err.to_string(),
        }
    }
}

/// Hits from a `list=search` payload. Entries without a numeric `pageid`
/// are dropped; anything that is not the expected shape yields no hits.
pub fn parse_search_response(body: &Value) -> Vec<SearchHit> {
    let Some(results) = body
        .get("query")
        .and_then(|q| q.get("search"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|entry| {
            let id = entry.get("pageid").and_then(Value::as_u64)?;
            let title = entry
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some(SearchHit { id, title })
        })
        .collect()
}

/// Plain-text extract for `id` from a `prop=extracts` payload, empty when
/// missing or not a string
pub fn parse_extract_response(body: &Value, id: u64) -> String {
    body.get("query")
        .and_then(|q| q.get("pages"))
        .and_then(|pages| pages.get(id.to_string()))
        .and_then(|page| page.get("extract"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl Retriever for WikipediaClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        info!(query, "Searching Wikipedia");
        let limit = limit.to_string();
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("list", "search"),
            ("srsearch", query),
            ("srlimit", limit.as_str()),
        ];

        let body = self.get_json(&params).await.inspect_err(|e| {
            metrics::record_retrieval_error(retrieval_error_kind(e));
        })?;
        let hits = parse_search_response(&body);
        info!(count = hits.len(), "Found search results");
        Ok(hits)
    }

    async fn fetch(&self, id: u64) -> Result<String> {
        debug!(page_id = id, "Fetching page content");
        let page_id = id.to_string();
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("pageids", page_id.as_str()),
            ("prop", "extracts"),
            ("explaintext", "1"),
            ("exsectionformat", "plain"),
        ];

        let body = self.get_json(&params).await.inspect_err(|e| {
            warn!(page_id = id, error = %e, "Error fetching page content");
            metrics::record_retrieval_error(retrieval_error_kind(e));
        })?;
        Ok(parse_extract_response(&body, id))
    }

    fn document_url(&self, id: u64) -> String {
        format!("{}{}", PAGE_URL_PREFIX, id)
    }
}

fn retrieval_error_kind(err: &AppError) -> &'static str {
    match err {
        AppError::RetrievalRateLimited => "rate_limited",
        AppError::RetrievalTimeout => "timeout",
        _ => "transient",
    }
}
