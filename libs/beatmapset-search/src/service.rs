//! Search service - end-to-end beatmapset listing
//!
//! Orchestrates a listing by:
//! - Compiling the parameters into an engine request
//! - Running the request against the search engine
//! - Hydrating the returned IDs from the relational store, in engine order

use crate::{
    config::Config,
    db::{MySqlStore, RelationStore},
    engine::{ElasticsearchClient, SearchEngine},
    models::{Beatmapset, BeatmapsetId, UserId},
    search::{BeatmapsetSearch, CanonicalParams, RawParams},
    Result,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// One page of hydrated search results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    /// Parameters the results were produced for; `page` is the page served
    pub params: CanonicalParams,
    pub records: Vec<Beatmapset>,
    /// Total matches reported by the engine
    pub total: u64,
}

/// Search service coordinating compiler, engine and relational store.
pub struct SearchService {
    compiler: BeatmapsetSearch,
    relations: Arc<dyn RelationStore>,
    engine: Arc<dyn SearchEngine>,
}

impl SearchService {
    pub fn new(
        compiler: BeatmapsetSearch,
        relations: Arc<dyn RelationStore>,
        engine: Arc<dyn SearchEngine>,
    ) -> Self {
        Self {
            compiler,
            relations,
            engine,
        }
    }

    /// Wire the MySQL store and Elasticsearch client from configuration.
    pub async fn connect(config: &Config) -> Result<Self> {
        let store = Arc::new(MySqlStore::connect(&config.database).await?);
        let engine = Arc::new(ElasticsearchClient::new(&config.engine)?);
        let compiler = BeatmapsetSearch::new(store.clone(), store.clone(), config.search.clone());
        Ok(Self::new(compiler, store, engine))
    }

    pub fn compiler(&self) -> &BeatmapsetSearch {
        &self.compiler
    }

    /// Compile, execute and hydrate a listing for `user_id`.
    #[tracing::instrument(skip(self, raw))]
    pub async fn search(&self, raw: &RawParams, user_id: Option<UserId>) -> Result<SearchResults> {
        let started = Instant::now();

        let mut params = self.compiler.normalize(raw);
        let request = self.compiler.build_request(&params, user_id).await?;
        params.page = request.page();
        let hits = self
            .engine
            .search(&self.compiler.config().index, &request)
            .await?;
        let records = self.records(&hits.ids).await?;

        tracing::info!(
            total = hits.total,
            returned = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Beatmapset search completed"
        );

        Ok(SearchResults {
            params,
            records,
            total: hits.total,
        })
    }

    /// Load records for `ids`, keeping their order. IDs without a record
    /// (deleted since indexing) are dropped.
    async fn records(&self, ids: &[BeatmapsetId]) -> Result<Vec<Beatmapset>> {
        let mut by_id: HashMap<BeatmapsetId, Beatmapset> = self
            .relations
            .beatmapsets_by_ids(ids)
            .await?
            .into_iter()
            .map(|set| (set.id, set))
            .collect();

        let records = ids.iter().filter_map(|id| by_id.remove(id)).collect::<Vec<_>>();
        if records.len() < ids.len() {
            tracing::debug!(
                missing = ids.len() - records.len(),
                "Search hits missing from relational store"
            );
        }
        Ok(records)
    }
}
