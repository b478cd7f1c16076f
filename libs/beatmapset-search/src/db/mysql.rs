//! MySQL-backed relation and score lookups
//!
//! Reads the osu! schema directly:
//! - `osu_favouritemaps` for favourites
//! - `osu_beatmapsets` / `osu_beatmaps` for ownership and set resolution
//! - `osu_scores{,_taiko,_fruits,_mania}_high` for best scores per mode

use super::traits::{RelationStore, ScoreStore};
use crate::{
    config::DatabaseConfig,
    models::{Beatmap, BeatmapId, Beatmapset, BeatmapsetId, GameMode, Rank, UserId},
    Error, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlPoolOptions, MySql, MySqlPool, QueryBuilder};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Favourited sets, skipping sets that have since been deleted.
const FAVOURITE_SETS_SQL: &str = "SELECT f.beatmapset_id FROM osu_favouritemaps f \
     INNER JOIN osu_beatmapsets s ON s.beatmapset_id = f.beatmapset_id \
     WHERE f.user_id = ? AND s.deleted_at IS NULL";

const OWNED_SETS_SQL: &str =
    "SELECT beatmapset_id FROM osu_beatmapsets WHERE user_id = ? AND deleted_at IS NULL";

/// Best score table for a game mode.
fn best_score_table(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Osu => "osu_scores_high",
        GameMode::Taiko => "osu_scores_taiko_high",
        GameMode::Fruits => "osu_scores_fruits_high",
        GameMode::Mania => "osu_scores_mania_high",
    }
}

#[derive(sqlx::FromRow)]
struct BeatmapsetRow {
    beatmapset_id: u32,
    user_id: u32,
    artist: String,
    title: String,
    creator: String,
    approved: i8,
    last_update: Option<DateTime<Utc>>,
    approved_date: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct BeatmapRow {
    beatmap_id: u32,
    beatmapset_id: u32,
    version: String,
    playmode: u8,
    difficultyrating: f32,
}

impl From<BeatmapRow> for Beatmap {
    fn from(row: BeatmapRow) -> Self {
        Beatmap {
            id: row.beatmap_id,
            beatmapset_id: row.beatmapset_id,
            version: row.version,
            mode: GameMode::from_id(i64::from(row.playmode)),
            difficulty_rating: row.difficultyrating,
        }
    }
}

/// Relation and score store over a MySQL pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Open a pool using the database section of the configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.pool_max_size)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(Error::relation_store)?;

        tracing::info!(
            max_connections = config.pool_max_size,
            "Connected to relational store"
        );
        Ok(Self::new(pool))
    }

    async fn fetch_beatmapset_ids(
        &self,
        sql: &str,
        user_id: UserId,
    ) -> Result<BTreeSet<BeatmapsetId>> {
        let ids = sqlx::query_scalar::<_, u32>(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::relation_store)?;

        Ok(ids.into_iter().collect())
    }
}

fn push_id_list<'a>(query: &mut QueryBuilder<'a, MySql>, ids: impl IntoIterator<Item = u32>) {
    query.push(" (");
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");
}

#[async_trait]
impl RelationStore for MySqlStore {
    #[tracing::instrument(skip(self))]
    async fn favourite_beatmapset_ids(&self, user_id: UserId) -> Result<BTreeSet<BeatmapsetId>> {
        self.fetch_beatmapset_ids(FAVOURITE_SETS_SQL, user_id).await
    }

    #[tracing::instrument(skip(self))]
    async fn owned_beatmapset_ids(&self, user_id: UserId) -> Result<BTreeSet<BeatmapsetId>> {
        self.fetch_beatmapset_ids(OWNED_SETS_SQL, user_id).await
    }

    #[tracing::instrument(skip_all, fields(beatmaps = beatmap_ids.len()))]
    async fn beatmapset_ids_for_beatmaps(
        &self,
        beatmap_ids: &BTreeSet<BeatmapId>,
    ) -> Result<BTreeSet<BeatmapsetId>> {
        if beatmap_ids.is_empty() {
            return Ok(BTreeSet::new());
        }

        let mut query = QueryBuilder::<MySql>::new(
            "SELECT DISTINCT beatmapset_id FROM osu_beatmaps WHERE beatmap_id IN",
        );
        push_id_list(&mut query, beatmap_ids.iter().copied());

        let ids = query
            .build_query_scalar::<u32>()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::relation_store)?;

        Ok(ids.into_iter().collect())
    }

    #[tracing::instrument(skip_all, fields(beatmapsets = ids.len()))]
    async fn beatmapsets_by_ids(&self, ids: &[BeatmapsetId]) -> Result<Vec<Beatmapset>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut sets_query = QueryBuilder::<MySql>::new(
            "SELECT beatmapset_id, user_id, artist, title, creator, approved, last_update, approved_date
             FROM osu_beatmapsets WHERE deleted_at IS NULL AND beatmapset_id IN",
        );
        push_id_list(&mut sets_query, ids.iter().copied());
        let set_rows = sets_query
            .build_query_as::<BeatmapsetRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::relation_store)?;

        let mut beatmaps_query = QueryBuilder::<MySql>::new(
            "SELECT beatmap_id, beatmapset_id, version, playmode, difficultyrating
             FROM osu_beatmaps WHERE deleted_at IS NULL AND beatmapset_id IN",
        );
        push_id_list(&mut beatmaps_query, ids.iter().copied());
        beatmaps_query.push(" ORDER BY playmode, difficultyrating");
        let beatmap_rows = beatmaps_query
            .build_query_as::<BeatmapRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::relation_store)?;

        let mut beatmaps_by_set: HashMap<BeatmapsetId, Vec<Beatmap>> = HashMap::new();
        for row in beatmap_rows {
            beatmaps_by_set
                .entry(row.beatmapset_id)
                .or_default()
                .push(row.into());
        }

        let beatmapsets = set_rows
            .into_iter()
            .map(|row| Beatmapset {
                id: row.beatmapset_id,
                user_id: row.user_id,
                artist: row.artist,
                title: row.title,
                creator: row.creator,
                approved: row.approved,
                last_update: row.last_update,
                approved_date: row.approved_date,
                beatmaps: beatmaps_by_set.remove(&row.beatmapset_id).unwrap_or_default(),
            })
            .collect();

        Ok(beatmapsets)
    }
}

#[async_trait]
impl ScoreStore for MySqlStore {
    #[tracing::instrument(skip(self, ranks), fields(ranks = ranks.len()))]
    async fn best_scores_for_user(
        &self,
        mode: GameMode,
        user_id: UserId,
        ranks: &BTreeSet<Rank>,
    ) -> Result<BTreeSet<BeatmapId>> {
        if ranks.is_empty() {
            return Ok(BTreeSet::new());
        }

        let mut query = QueryBuilder::<MySql>::new("SELECT beatmap_id FROM ");
        query.push(best_score_table(mode));
        query.push(" WHERE user_id = ");
        query.push_bind(user_id);
        query.push(" AND `rank` IN (");
        let mut separated = query.separated(", ");
        for rank in ranks {
            separated.push_bind(rank.as_str());
        }
        separated.push_unseparated(")");

        let ids = query
            .build_query_scalar::<u32>()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::score_store)?;

        Ok(ids.into_iter().collect())
    }
}
