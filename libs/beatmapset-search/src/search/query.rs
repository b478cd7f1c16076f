//! Boolean query tree and its engine JSON rendering.
//!
//! A `BoolQuery` holds required (`must`) clauses and optional (`should`)
//! clauses of which at least `minimum_should_match` have to match.

use crate::models::BeatmapsetId;
use serde_json::{json, Map, Value as JsonValue};

/// Value compared by a `match` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchValue {
    Int(i64),
    Bool(bool),
}

impl From<i64> for MatchValue {
    fn from(value: i64) -> Self {
        MatchValue::Int(value)
    }
}

impl From<i32> for MatchValue {
    fn from(value: i32) -> Self {
        MatchValue::Int(value.into())
    }
}

impl From<bool> for MatchValue {
    fn from(value: bool) -> Self {
        MatchValue::Bool(value)
    }
}

impl MatchValue {
    fn to_json(self) -> JsonValue {
        match self {
            MatchValue::Int(v) => json!(v),
            MatchValue::Bool(v) => json!(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Field equality
    Match { field: String, value: MatchValue },
    /// Document ID membership; an empty set matches nothing
    Ids { values: Vec<BeatmapsetId> },
    /// Engine query-string syntax; callers escape user text first
    QueryString { query: String },
    Bool(BoolQuery),
}

impl Clause {
    pub fn matches(field: impl Into<String>, value: impl Into<MatchValue>) -> Self {
        Clause::Match {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ids(values: impl IntoIterator<Item = BeatmapsetId>) -> Self {
        Clause::Ids {
            values: values.into_iter().collect(),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Clause::Match { field, value } => {
                let mut inner = Map::new();
                inner.insert(field.clone(), value.to_json());
                json!({ "match": inner })
            }
            Clause::Ids { values } => json!({ "ids": { "values": values } }),
            Clause::QueryString { query } => json!({ "query_string": { "query": query } }),
            Clause::Bool(query) => query.to_json(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolQuery {
    must: Vec<Clause>,
    should: Vec<Clause>,
    minimum_should_match: Option<u32>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_match(mut self, count: u32) -> Self {
        self.minimum_should_match = Some(count);
        self
    }

    pub fn must(&mut self, clause: Clause) -> &mut Self {
        self.must.push(clause);
        self
    }

    pub fn should(&mut self, clauses: impl IntoIterator<Item = Clause>) -> &mut Self {
        self.should.extend(clauses);
        self
    }

    pub fn must_clauses(&self) -> &[Clause] {
        &self.must
    }

    pub fn should_clauses(&self) -> &[Clause] {
        &self.should
    }

    pub fn minimum_should_match(&self) -> Option<u32> {
        self.minimum_should_match
    }

    /// No clauses at all: the branch does not constrain results.
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty()
    }

    /// Render as `{"bool": {...}}`. `minimum_should_match` is emitted only
    /// alongside a non-empty `should` list.
    pub fn to_json(&self) -> JsonValue {
        let mut body = Map::new();
        if !self.must.is_empty() {
            body.insert(
                "must".to_string(),
                JsonValue::Array(self.must.iter().map(Clause::to_json).collect()),
            );
        }
        if !self.should.is_empty() {
            body.insert(
                "should".to_string(),
                JsonValue::Array(self.should.iter().map(Clause::to_json).collect()),
            );
            if let Some(count) = self.minimum_should_match {
                body.insert("minimum_should_match".to_string(), json!(count));
            }
        }
        json!({ "bool": body })
    }
}
