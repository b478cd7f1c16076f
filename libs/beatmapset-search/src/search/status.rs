use super::query::{BoolQuery, Clause};
use super::BeatmapsetSearch;
use crate::models::{ApprovalState, GameMode, UserId};
use crate::Result;

const APPROVAL_FIELD: &str = "approved";
const PLAYMODE_FIELD: &str = "difficulties.playmode";

/// Filter strategy selected by a listing status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// At least one of the states (should branch)
    AnyOf(&'static [ApprovalState]),
    /// Exactly this state (must clause)
    Exactly(ApprovalState),
    /// Beatmapsets the current user favourited
    Favourites,
    /// Beatmapsets the current user created
    OwnMaps,
    /// No status restriction
    Any,
}

impl StatusFilter {
    /// Codes outside the table, and no code at all, restrict nothing.
    pub fn from_code(code: Option<i64>) -> Self {
        use ApprovalState as S;

        match code {
            Some(0) => Self::AnyOf(&[S::Ranked, S::Approved]),
            Some(1) => Self::Exactly(S::Approved),
            Some(2) => Self::Favourites,
            Some(3) => Self::AnyOf(&[S::Qualified]),
            Some(4) => Self::AnyOf(&[S::Wip, S::Pending]),
            Some(5) => Self::Exactly(S::Graveyard),
            Some(6) => Self::OwnMaps,
            Some(7) => Self::Any,
            Some(8) => Self::AnyOf(&[S::Loved]),
            _ => Self::Any,
        }
    }
}

fn approval_clause(state: ApprovalState) -> Clause {
    Clause::matches(APPROVAL_FIELD, state.value())
}

/// Restricts results to sets with at least one difficulty in `mode`.
pub(crate) fn mode_clause(mode: GameMode) -> Clause {
    Clause::matches(PLAYMODE_FIELD, mode.id())
}

impl BeatmapsetSearch {
    /// Add the clauses for `filter` to `query`. User-scoped filters resolve
    /// to an empty ID set for signed-out users.
    pub(super) async fn apply_status_filter(
        &self,
        query: &mut BoolQuery,
        filter: StatusFilter,
        user_id: Option<UserId>,
    ) -> Result<()> {
        match filter {
            StatusFilter::AnyOf(states) => {
                query.should(states.iter().copied().map(approval_clause));
            }
            StatusFilter::Exactly(state) => {
                query.must(approval_clause(state));
            }
            StatusFilter::Favourites => {
                let ids = match user_id {
                    Some(user_id) => self.relations.favourite_beatmapset_ids(user_id).await?,
                    None => Default::default(),
                };
                query.must(Clause::ids(ids));
            }
            StatusFilter::OwnMaps => {
                let ids = match user_id {
                    Some(user_id) => self.relations.owned_beatmapset_ids(user_id).await?,
                    None => Default::default(),
                };
                query.must(Clause::ids(ids));
            }
            StatusFilter::Any => {}
        }
        Ok(())
    }
}
