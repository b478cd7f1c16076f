#![allow(dead_code)]

use async_trait::async_trait;
use beatmapset_search::{
    config::SearchConfig,
    db::{RelationStore, ScoreStore},
    engine::{SearchEngine, SearchHits},
    models::{Beatmap, BeatmapId, Beatmapset, BeatmapsetId, GameMode, Rank, UserId},
    BeatmapsetSearch, Error, RawParams, Result, SearchRequest,
};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const MAX_LIMIT: usize = 50;

pub fn raw(pairs: &[(&str, &str)]) -> RawParams {
    let items = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<Vec<_>>();
    RawParams::from_pairs(&items)
}

pub fn search_config() -> SearchConfig {
    SearchConfig {
        max_limit: MAX_LIMIT,
        ..SearchConfig::default()
    }
}

/// In-memory relation store.
#[derive(Default)]
pub struct MemoryRelations {
    pub favourites: HashMap<UserId, BTreeSet<BeatmapsetId>>,
    pub owned: HashMap<UserId, BTreeSet<BeatmapsetId>>,
    pub beatmap_sets: HashMap<BeatmapId, BeatmapsetId>,
    pub records: Vec<Beatmapset>,
    pub unavailable: bool,
    pub calls: Mutex<Vec<&'static str>>,
}

impl MemoryRelations {
    fn record_call(&self, name: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(name);
        if self.unavailable {
            return Err(Error::relation_store("connection refused"));
        }
        Ok(())
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelationStore for MemoryRelations {
    async fn favourite_beatmapset_ids(&self, user_id: UserId) -> Result<BTreeSet<BeatmapsetId>> {
        self.record_call("favourites")?;
        Ok(self.favourites.get(&user_id).cloned().unwrap_or_default())
    }

    async fn owned_beatmapset_ids(&self, user_id: UserId) -> Result<BTreeSet<BeatmapsetId>> {
        self.record_call("owned")?;
        Ok(self.owned.get(&user_id).cloned().unwrap_or_default())
    }

    async fn beatmapset_ids_for_beatmaps(
        &self,
        beatmap_ids: &BTreeSet<BeatmapId>,
    ) -> Result<BTreeSet<BeatmapsetId>> {
        self.record_call("beatmapsets_for_beatmaps")?;
        Ok(beatmap_ids
            .iter()
            .filter_map(|id| self.beatmap_sets.get(id).copied())
            .collect())
    }

    async fn beatmapsets_by_ids(&self, ids: &[BeatmapsetId]) -> Result<Vec<Beatmapset>> {
        self.record_call("beatmapsets_by_ids")?;
        Ok(self
            .records
            .iter()
            .filter(|set| ids.contains(&set.id))
            .cloned()
            .collect())
    }
}

/// In-memory best-score tables with optional per-mode latency.
#[derive(Default)]
pub struct MemoryScores {
    pub scores: HashMap<(GameMode, UserId), Vec<(BeatmapId, Rank)>>,
    pub delays: HashMap<GameMode, Duration>,
    pub unavailable: bool,
    pub lookups: Mutex<Vec<GameMode>>,
    pub completed: Mutex<Vec<GameMode>>,
}

impl MemoryScores {
    pub fn lookups(&self) -> Vec<GameMode> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn completed(&self) -> Vec<GameMode> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoreStore for MemoryScores {
    async fn best_scores_for_user(
        &self,
        mode: GameMode,
        user_id: UserId,
        ranks: &BTreeSet<Rank>,
    ) -> Result<BTreeSet<BeatmapId>> {
        self.lookups.lock().unwrap().push(mode);
        if let Some(delay) = self.delays.get(&mode) {
            tokio::time::sleep(*delay).await;
        }
        if self.unavailable {
            return Err(Error::score_store("score database offline"));
        }
        self.completed.lock().unwrap().push(mode);

        Ok(self
            .scores
            .get(&(mode, user_id))
            .map(|scores| {
                scores
                    .iter()
                    .filter(|(_, rank)| ranks.contains(rank))
                    .map(|(id, _)| *id)
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Engine returning canned hits and recording the requests it received.
#[derive(Default)]
pub struct FakeEngine {
    pub hits: SearchHits,
    pub unavailable: bool,
    pub requests: Mutex<Vec<(String, Value)>>,
}

#[async_trait]
impl SearchEngine for FakeEngine {
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<SearchHits> {
        self.requests
            .lock()
            .unwrap()
            .push((index.to_string(), request.to_json()));
        if self.unavailable {
            return Err(Error::search_engine("cluster red"));
        }
        Ok(self.hits.clone())
    }
}

pub fn compiler(relations: Arc<MemoryRelations>, scores: Arc<MemoryScores>) -> BeatmapsetSearch {
    BeatmapsetSearch::new(relations, scores, search_config())
}

pub fn default_compiler() -> BeatmapsetSearch {
    compiler(
        Arc::new(MemoryRelations::default()),
        Arc::new(MemoryScores::default()),
    )
}

pub fn beatmapset(id: BeatmapsetId, title: &str) -> Beatmapset {
    Beatmapset {
        id,
        user_id: 2,
        artist: "xi".to_string(),
        title: title.to_string(),
        creator: "Nakagawa-Kanon".to_string(),
        approved: 1,
        last_update: None,
        approved_date: None,
        beatmaps: vec![Beatmap {
            id: id * 10,
            beatmapset_id: id,
            version: "Insane".to_string(),
            mode: Some(GameMode::Osu),
            difficulty_rating: 5.2,
        }],
    }
}
