//! Knowledge-source retrieval
//!
//! The orchestrator only sees the [`Retriever`] trait; [`WikipediaClient`]
//! is the production implementation over the MediaWiki action API.

mod wikipedia;

pub use wikipedia::{parse_extract_response, parse_search_response, WikipediaClient};

use crate::errors::Result;
use crate::models::SearchHit;
use async_trait::async_trait;

#[async_trait]
pub trait Retriever: Send + Sync {
    /// Ranked candidates for a query, at most `limit`.
    ///
    /// Fails with `RetrievalRateLimited`, `RetrievalTimeout`, or
    /// `RetrievalTransient` for anything else.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;

    /// Plain-text body of a document; empty when the source has none
    async fn fetch(&self, id: u64) -> Result<String>;

    /// Public URL of a document
    fn document_url(&self, id: u64) -> String;
}
