//! Beatmapset search compilation
//!
//! `BeatmapsetSearch` is responsible for:
//! - Normalizing raw listing parameters
//! - Resolving user-scoped filters against the relational store
//! - Building the boolean query and sort clauses
//! - Assembling the engine request

use crate::config::SearchConfig;
use crate::db::{RelationStore, ScoreStore};
use std::sync::Arc;

mod compiler;
mod escape;
pub mod params;
pub mod query;
mod ranks;
pub mod request;
pub mod sort;
pub mod status;

pub use params::{CanonicalParams, RawParams, RawValue, SortField, SortOrder};
pub use query::{BoolQuery, Clause, MatchValue};
pub use request::SearchRequest;
pub use sort::{normalize_sort, SortClause, SortMode, SortOptions, SortSpec};
pub use status::StatusFilter;

/// Compiles listing parameters into engine requests.
///
/// Holds no per-request state; one instance serves concurrent calls.
#[derive(Clone)]
pub struct BeatmapsetSearch {
    relations: Arc<dyn RelationStore>,
    scores: Arc<dyn ScoreStore>,
    config: SearchConfig,
}
