//! Lookup traits for the relational data the compiler depends on
//!
//! The compiler only needs a few narrow ID lookups, so any backend (MySQL,
//! an HTTP proxy, in-memory fixtures) can serve them. Implementations report
//! infrastructure failures with `Error::relation_store` or
//! `Error::score_store` and never retry.

use crate::{
    models::{BeatmapId, Beatmapset, BeatmapsetId, GameMode, Rank, UserId},
    Result,
};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Relations between users, beatmaps and beatmapsets.
#[async_trait]
pub trait RelationStore: Send + Sync {
    /// Beatmapsets the user has favourited.
    async fn favourite_beatmapset_ids(&self, user_id: UserId) -> Result<BTreeSet<BeatmapsetId>>;

    /// Beatmapsets created by the user.
    async fn owned_beatmapset_ids(&self, user_id: UserId) -> Result<BTreeSet<BeatmapsetId>>;

    /// Owning beatmapset of each beatmap. Unknown beatmaps are skipped.
    async fn beatmapset_ids_for_beatmaps(
        &self,
        beatmap_ids: &BTreeSet<BeatmapId>,
    ) -> Result<BTreeSet<BeatmapsetId>>;

    /// Full records with their beatmaps, in no particular order.
    async fn beatmapsets_by_ids(&self, ids: &[BeatmapsetId]) -> Result<Vec<Beatmapset>>;
}

/// Per-mode best score tables.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Beatmaps on which the user's best score in `mode` has one of `ranks`.
    async fn best_scores_for_user(
        &self,
        mode: GameMode,
        user_id: UserId,
        ranks: &BTreeSet<Rank>,
    ) -> Result<BTreeSet<BeatmapId>>;
}
