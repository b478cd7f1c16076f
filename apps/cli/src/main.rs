//! Beatmapset search CLI
//!
//! `compile` prints the engine request for a set of listing parameters.
//! `search` runs the listing end to end against the configured database
//! and search engine.

use anyhow::Context;
use async_trait::async_trait;
use beatmapset_search::{
    db::{MySqlStore, RelationStore, ScoreStore},
    logging,
    models::{BeatmapId, Beatmapset, BeatmapsetId, GameMode, Rank, UserId},
    BeatmapsetSearch, Config, Error, RawParams, SearchService,
};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "beatmapset-search", version, about = "Beatmapset search compiler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the compiled engine request as JSON
    Compile {
        #[command(flatten)]
        params: ListingArgs,
        /// Resolve user-scoped filters for this user (needs the database)
        #[arg(long)]
        user: Option<UserId>,
    },
    /// Run the search and print hydrated records as JSON
    Search {
        #[command(flatten)]
        params: ListingArgs,
        #[arg(long)]
        user: Option<UserId>,
    },
}

/// Listing parameters, passed through unparsed like query-string values.
#[derive(Args)]
struct ListingArgs {
    #[arg(long, short)]
    query: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    language: Option<String>,
    #[arg(long)]
    mode: Option<String>,
    /// Dot-separated: video.storyboard
    #[arg(long)]
    extra: Option<String>,
    /// Dot-separated grades, e.g. S.X
    #[arg(long)]
    rank: Option<String>,
    #[arg(long)]
    limit: Option<String>,
    #[arg(long)]
    page: Option<String>,
    /// field_order, e.g. artist_asc
    #[arg(long)]
    sort: Option<String>,
}

impl ListingArgs {
    fn into_raw(self) -> RawParams {
        let pairs = [
            ("query", self.query),
            ("status", self.status),
            ("genre", self.genre),
            ("language", self.language),
            ("mode", self.mode),
            ("extra", self.extra),
            ("rank", self.rank),
            ("limit", self.limit),
            ("page", self.page),
            ("sort", self.sort),
        ];

        let mut raw = RawParams::new();
        for (key, value) in pairs {
            if let Some(value) = value {
                raw.insert(key, value);
            }
        }
        raw
    }
}

/// Store for signed-out compilation; user-scoped lookups never reach it.
struct OfflineStore;

#[async_trait]
impl RelationStore for OfflineStore {
    async fn favourite_beatmapset_ids(
        &self,
        _user_id: UserId,
    ) -> beatmapset_search::Result<BTreeSet<BeatmapsetId>> {
        Err(Error::relation_store("no database configured"))
    }

    async fn owned_beatmapset_ids(
        &self,
        _user_id: UserId,
    ) -> beatmapset_search::Result<BTreeSet<BeatmapsetId>> {
        Err(Error::relation_store("no database configured"))
    }

    async fn beatmapset_ids_for_beatmaps(
        &self,
        _beatmap_ids: &BTreeSet<BeatmapId>,
    ) -> beatmapset_search::Result<BTreeSet<BeatmapsetId>> {
        Err(Error::relation_store("no database configured"))
    }

    async fn beatmapsets_by_ids(
        &self,
        _ids: &[BeatmapsetId],
    ) -> beatmapset_search::Result<Vec<Beatmapset>> {
        Err(Error::relation_store("no database configured"))
    }
}

#[async_trait]
impl ScoreStore for OfflineStore {
    async fn best_scores_for_user(
        &self,
        _mode: GameMode,
        _user_id: UserId,
        _ranks: &BTreeSet<Rank>,
    ) -> beatmapset_search::Result<BTreeSet<BeatmapId>> {
        Err(Error::score_store("no database configured"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Command::Compile { params, user } => {
            let compiler = match user {
                Some(_) => {
                    let store = Arc::new(
                        MySqlStore::connect(&config.database)
                            .await
                            .context("Failed to connect to database")?,
                    );
                    BeatmapsetSearch::new(store.clone(), store, config.search.clone())
                }
                None => {
                    let store = Arc::new(OfflineStore);
                    BeatmapsetSearch::new(store.clone(), store, config.search.clone())
                }
            };

            let request = compiler.compile(&params.into_raw(), user).await?;
            println!("{}", serde_json::to_string_pretty(&request.to_json())?);
        }
        Command::Search { params, user } => {
            let service = SearchService::connect(&config)
                .await
                .context("Failed to initialize search service")?;
            let results = service.search(&params.into_raw(), user).await?;
            tracing::info!(total = results.total, "Search finished");
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
