//! Elasticsearch `_search` client

use super::{SearchEngine, SearchHits};
use crate::{config::EngineConfig, search::SearchRequest, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    total: Total,
    #[serde(default)]
    hits: Vec<Hit>,
}

/// `hits.total` is an object since Elasticsearch 7 and a number before it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Total {
    Object { value: u64 },
    Number(u64),
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
}

/// Client for an Elasticsearch-compatible engine.
pub struct ElasticsearchClient {
    client: Client,
    base_url: String,
}

impl ElasticsearchClient {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(Error::search_engine)?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }
}

fn parse_hits(response: SearchResponse) -> SearchHits {
    let total = match response.hits.total {
        Total::Object { value } => value,
        Total::Number(value) => value,
    };

    let ids = response
        .hits
        .hits
        .into_iter()
        .filter_map(|hit| match hit.id.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!(id = %hit.id, "Ignoring hit with non-numeric id");
                None
            }
        })
        .collect();

    SearchHits { ids, total }
}

#[async_trait]
impl SearchEngine for ElasticsearchClient {
    #[tracing::instrument(skip(self, request), fields(page = request.page(), size = request.size()))]
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<SearchHits> {
        let url = format!("{}/{}/_search", self.base_url, index);

        let response = self
            .client
            .post(&url)
            .json(&request.to_json())
            .send()
            .await
            .map_err(Error::search_engine)?;

        if !response.status().is_success() {
            return Err(Error::search_engine(format!(
                "Search failed with status: {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await.map_err(Error::search_engine)?;
        let hits = parse_hits(body);

        tracing::debug!(hits = hits.ids.len(), total = hits.total, "Search completed");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object_total() {
        let response: SearchResponse = serde_json::from_value(json!({
            "took": 3,
            "hits": {
                "total": {"value": 42, "relation": "eq"},
                "hits": [
                    {"_id": "1021", "_score": null},
                    {"_id": "77", "_score": null},
                ],
            },
        }))
        .unwrap();

        let hits = parse_hits(response);
        assert_eq!(hits.ids, vec![1021, 77]);
        assert_eq!(hits.total, 42);
    }

    #[test]
    fn test_parse_numeric_total_and_skip_bad_ids() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": {
                "total": 3,
                "hits": [{"_id": "5"}, {"_id": "abc"}],
            },
        }))
        .unwrap();

        let hits = parse_hits(response);
        assert_eq!(hits.ids, vec![5]);
        assert_eq!(hits.total, 3);
    }
}
