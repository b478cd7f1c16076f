use super::query::BoolQuery;
use super::sort::SortSpec;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeSet;

/// Only document IDs are requested; records are re-read from the
/// relational store.
pub const ID_FIELD: &str = "_id";

/// Compiled engine request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: BoolQuery,
    sort: SortSpec,
    page: usize,
    size: usize,
    fields: BTreeSet<String>,
}

impl SearchRequest {
    pub(crate) fn new(query: BoolQuery, sort: SortSpec, page: usize, size: usize) -> Self {
        Self {
            query,
            sort,
            page,
            size,
            fields: BTreeSet::from([ID_FIELD.to_string()]),
        }
    }

    pub fn query(&self) -> &BoolQuery {
        &self.query
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// 1-based page number
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn fields(&self) -> &BTreeSet<String> {
        &self.fields
    }

    /// Offset of the first hit.
    pub fn from(&self) -> usize {
        (self.page - 1) * self.size
    }

    /// Body for the engine's `_search` endpoint.
    pub fn to_json(&self) -> JsonValue {
        let source: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        json!({
            "from": self.from(),
            "size": self.size,
            "_source": source,
            "sort": self.sort.to_json(),
            "query": self.query.to_json(),
        })
    }
}
