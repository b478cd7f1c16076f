use super::escape::escape_query_string;
use super::params::{CanonicalParams, RawParams};
use super::query::{BoolQuery, Clause};
use super::request::SearchRequest;
use super::sort::normalize_sort;
use super::status::{mode_clause, StatusFilter};
use super::BeatmapsetSearch;
use crate::config::SearchConfig;
use crate::db::{RelationStore, ScoreStore};
use crate::models::UserId;
use crate::Result;
use std::sync::Arc;

const GENRE_FIELD: &str = "genre_id";
const LANGUAGE_FIELD: &str = "language_id";

impl BeatmapsetSearch {
    pub fn new(
        relations: Arc<dyn RelationStore>,
        scores: Arc<dyn ScoreStore>,
        config: SearchConfig,
    ) -> Self {
        Self {
            relations,
            scores,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Normalize raw parameters with the configured page size cap.
    pub fn normalize(&self, raw: &RawParams) -> CanonicalParams {
        CanonicalParams::from_raw(raw, self.config.max_limit)
    }

    /// Compile raw parameters for `user_id` (`None` when signed out).
    pub async fn compile(&self, raw: &RawParams, user_id: Option<UserId>) -> Result<SearchRequest> {
        let params = self.normalize(raw);
        self.build_request(&params, user_id).await
    }

    /// Assemble the engine request for already-normalized parameters.
    #[tracing::instrument(skip(self, params), fields(status = params.status))]
    pub async fn build_request(
        &self,
        params: &CanonicalParams,
        user_id: Option<UserId>,
    ) -> Result<SearchRequest> {
        let query = self.build_query(params, user_id).await?;
        let sort = normalize_sort(params.sort_field, params.sort_order);

        let size = params.limit;
        let max_page = (self.config.max_result_window / size).max(1);
        let page = params.page.min(max_page);
        if page != params.page {
            tracing::debug!(
                requested = params.page,
                page,
                "Page capped to the engine result window"
            );
        }

        Ok(SearchRequest::new(query, sort, page, size))
    }

    /// Build the boolean query. Clause order: genre, language, extra flags,
    /// text, rank filter, status filter, mode.
    pub async fn build_query(
        &self,
        params: &CanonicalParams,
        user_id: Option<UserId>,
    ) -> Result<BoolQuery> {
        let mut query = BoolQuery::new().should_match(1);

        if let Some(genre) = params.genre {
            query.must(Clause::matches(GENRE_FIELD, genre));
        }

        if let Some(language) = params.language {
            query.must(Clause::matches(LANGUAGE_FIELD, language));
        }

        for flag in &params.extra {
            query.must(Clause::matches(flag.field(), true));
        }

        if let Some(text) = &params.query_text {
            query.must(Clause::QueryString {
                query: escape_query_string(text),
            });
        }

        if let Some(ids) = self
            .resolve_rank_filter(user_id, &params.ranks, params.mode)
            .await?
        {
            query.must(Clause::ids(ids));
        }

        let status = StatusFilter::from_code(Some(params.status));
        self.apply_status_filter(&mut query, status, user_id).await?;

        if let Some(mode) = params.mode {
            query.must(mode_clause(mode));
        }

        Ok(query)
    }
}
