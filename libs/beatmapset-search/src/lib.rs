//! Beatmapset search compiler
//!
//! Turns loosely-typed listing parameters into an Elasticsearch request:
//! - Parameter normalization with context-sensitive sort defaults
//! - Boolean query construction (genre, language, flags, text, status, mode)
//! - User-scoped filters resolved through the relational store
//!   (favourites, own maps, achieved score ranks)
//! - Record hydration of engine hits from the relational store

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod search;
pub mod service;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use search::{BeatmapsetSearch, CanonicalParams, RawParams, SearchRequest};
pub use service::{SearchResults, SearchService};
