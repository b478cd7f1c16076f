//! Error types for the beatmapset search compiler
//!
//! Malformed search input never produces an error; it is normalized to
//! defaults. The failures surfaced here are infrastructure failures of
//! the collaborators the compiler calls, plus configuration problems.

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// External collaborator a search call depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    /// Favourites, own maps, beatmap → beatmapset resolution, record hydration
    RelationStore,
    /// Per-mode best score tables
    ScoreStore,
    /// Elasticsearch-compatible engine
    SearchEngine,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dependency::RelationStore => "relation store",
            Dependency::ScoreStore => "score store",
            Dependency::SearchEngine => "search engine",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dependency unavailable ({dependency}): {source}")]
    DependencyUnavailable {
        dependency: Dependency,
        #[source]
        source: BoxError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn relation_store(source: impl Into<BoxError>) -> Self {
        Self::unavailable(Dependency::RelationStore, source)
    }

    pub fn score_store(source: impl Into<BoxError>) -> Self {
        Self::unavailable(Dependency::ScoreStore, source)
    }

    pub fn search_engine(source: impl Into<BoxError>) -> Self {
        Self::unavailable(Dependency::SearchEngine, source)
    }

    fn unavailable(dependency: Dependency, source: impl Into<BoxError>) -> Self {
        let source = source.into();
        tracing::warn!(%dependency, error = %source, "Search dependency unavailable");
        Self::DependencyUnavailable { dependency, source }
    }

    /// Whether this error came from an external collaborator rather than
    /// from the compiler or its configuration.
    pub fn is_dependency_unavailable(&self) -> bool {
        matches!(self, Error::DependencyUnavailable { .. })
    }

    pub fn dependency(&self) -> Option<Dependency> {
        match self {
            Error::DependencyUnavailable { dependency, .. } => Some(*dependency),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
