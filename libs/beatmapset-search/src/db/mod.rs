//! Database layer - lookups against the relational store

pub mod mysql;
pub mod traits;

pub use mysql::MySqlStore;
pub use traits::{RelationStore, ScoreStore};
