//! Search engine client boundary

pub mod elasticsearch;

use crate::{models::BeatmapsetId, search::SearchRequest, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use elasticsearch::ElasticsearchClient;

/// One page of matching document IDs, in engine order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHits {
    pub ids: Vec<BeatmapsetId>,
    /// Total matching documents across all pages
    pub total: u64,
}

/// Executes compiled requests. Failures map to `Error::search_engine`.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<SearchHits>;
}
