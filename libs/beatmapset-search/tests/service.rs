mod support;

use beatmapset_search::{engine::SearchHits, error::Dependency, SearchService};
use std::sync::Arc;
use support::*;

fn service(relations: MemoryRelations, engine: FakeEngine) -> (SearchService, Arc<FakeEngine>) {
    let relations = Arc::new(relations);
    let engine = Arc::new(engine);
    let compiler = compiler(relations.clone(), Arc::new(MemoryScores::default()));
    (
        SearchService::new(compiler, relations, engine.clone()),
        engine,
    )
}

#[tokio::test]
async fn records_follow_engine_order() -> anyhow::Result<()> {
    let relations = MemoryRelations {
        records: vec![beatmapset(1, "FREEDOM DiVE"), beatmapset(2, "Blue Zenith"), beatmapset(3, "Galaxy Collapse")],
        ..MemoryRelations::default()
    };
    let engine = FakeEngine {
        hits: SearchHits {
            ids: vec![3, 9, 1],
            total: 3,
        },
        ..FakeEngine::default()
    };
    let (service, engine) = service(relations, engine);

    let results = service
        .search(&raw(&[("query", "xi"), ("limit", "3")]), None)
        .await?;

    let ids = results.records.iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(results.total, 3);
    assert_eq!(results.params.limit, 3);

    let requests = engine.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (index, body) = &requests[0];
    assert_eq!(index, "beatmaps");
    assert_eq!(body["size"], 3);
    assert_eq!(body["_source"], serde_json::json!(["_id"]));
    Ok(())
}

#[tokio::test]
async fn results_report_the_page_served() -> anyhow::Result<()> {
    let (service, engine) = service(MemoryRelations::default(), FakeEngine::default());

    let results = service
        .search(&raw(&[("page", "100000"), ("limit", "50")]), None)
        .await?;

    assert_eq!(results.params.page, 200);
    let requests = engine.requests.lock().unwrap();
    assert_eq!(requests[0].1["from"], 9950);
    Ok(())
}

#[tokio::test]
async fn engine_failure_propagates_as_dependency_error() {
    let engine = FakeEngine {
        unavailable: true,
        ..FakeEngine::default()
    };
    let (service, _) = service(MemoryRelations::default(), engine);

    let err = service.search(&raw(&[]), None).await.unwrap_err();
    assert_eq!(err.dependency(), Some(Dependency::SearchEngine));
}

#[tokio::test]
async fn relation_failure_propagates_as_dependency_error() {
    let relations = MemoryRelations {
        unavailable: true,
        ..MemoryRelations::default()
    };
    let (service, engine) = service(relations, FakeEngine::default());

    let err = service
        .search(&raw(&[("status", "2")]), Some(5))
        .await
        .unwrap_err();
    assert_eq!(err.dependency(), Some(Dependency::RelationStore));
    assert!(engine.requests.lock().unwrap().is_empty());
}
