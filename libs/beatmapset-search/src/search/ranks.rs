use super::BeatmapsetSearch;
use crate::models::{BeatmapId, BeatmapsetId, GameMode, Rank, UserId};
use crate::Result;
use futures::future::try_join_all;
use std::collections::BTreeSet;

/// Modes to search scores in: the requested one, or every mode.
pub(crate) fn rank_modes(mode: Option<GameMode>) -> Vec<GameMode> {
    match mode {
        Some(mode) => vec![mode],
        None => GameMode::ALL.to_vec(),
    }
}

impl BeatmapsetSearch {
    /// Beatmapsets on which the user achieved one of `ranks`.
    ///
    /// Returns `None` when no ranks were requested (no filter). Signed-out
    /// users get an empty set, as do users without matching scores.
    #[tracing::instrument(skip(self, ranks), fields(ranks = ranks.len()))]
    pub(super) async fn resolve_rank_filter(
        &self,
        user_id: Option<UserId>,
        ranks: &BTreeSet<Rank>,
        mode: Option<GameMode>,
    ) -> Result<Option<BTreeSet<BeatmapsetId>>> {
        if ranks.is_empty() {
            return Ok(None);
        }
        let Some(user_id) = user_id else {
            return Ok(Some(BTreeSet::new()));
        };

        let lookups = rank_modes(mode)
            .into_iter()
            .map(|mode| self.scores.best_scores_for_user(mode, user_id, ranks));
        let beatmap_ids: BTreeSet<BeatmapId> =
            try_join_all(lookups).await?.into_iter().flatten().collect();

        let beatmapset_ids = self
            .relations
            .beatmapset_ids_for_beatmaps(&beatmap_ids)
            .await?;

        tracing::debug!(
            beatmaps = beatmap_ids.len(),
            beatmapsets = beatmapset_ids.len(),
            "Resolved rank filter"
        );
        Ok(Some(beatmapset_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_mode_is_used_as_is() {
        assert_eq!(rank_modes(Some(GameMode::Fruits)), vec![GameMode::Fruits]);
    }

    #[test]
    fn test_absent_mode_expands_to_all_modes() {
        assert_eq!(rank_modes(None), GameMode::ALL.to_vec());
    }
}
