//! Tests for the catalog module

use super::*;
use crate::config::PipelineConfig;
use crate::types::SourceId;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde_json::json;
use std::sync::Arc;

fn test_config() -> PipelineConfig {
    PipelineConfig::from_str(
        r#"
bucket: test-bucket
database: tourism_db
crawler:
  name: test-crawler
  table_prefix: tourism_
  poll_interval_seconds: 1
source_paths:
  booking_hotels: "raw-json/booking-full-hotel.json"
  booking_reviews: "raw-json/booking-full-review.json"
  tripadvisor_hotels: "raw-json/tripadvisor-full-hotel.json"
  tripadvisor_reviews: "raw-json/tripadvisor-full-review.json"
  geospatial_attractions: "raw-json/geospatial-attractions.json"
"#,
    )
    .unwrap()
}

async fn put_json(store: &Arc<InMemory>, path: &str, value: serde_json::Value) {
    store
        .put(
            &ObjectPath::from(path),
            bytes::Bytes::from(serde_json::to_vec(&value).unwrap()).into(),
        )
        .await
        .unwrap();
}

async fn seeded_catalog() -> (Arc<InMemory>, LocalCatalog) {
    let store = Arc::new(InMemory::new());
    put_json(
        &store,
        "raw-json/booking-full-hotel.json",
        json!([
            {"hotelId": 1, "name": "Tentrem", "rating": {"double": 8.9}},
            {"hotelId": 2, "name": "Melia", "rating": {"double": 8.1}}
        ]),
    )
    .await;
    put_json(
        &store,
        "raw-json/geospatial-attractions.json",
        json!([{"placeId": "x", "title": "Taman Sari", "totalScore": 4.6}]),
    )
    .await;
    let catalog = LocalCatalog::new(store.clone() as Arc<dyn ObjectStore>);
    (store, catalog)
}

fn crawler_spec() -> CrawlerSpec {
    CrawlerSpec {
        name: "test-crawler".to_string(),
        database: "tourism_db".to_string(),
        table_prefix: "tourism_".to_string(),
        targets: vec![StorageTarget::new("raw-json")],
    }
}

async fn wait_for_terminal(catalog: &LocalCatalog, handle: &CrawlerHandle) -> CrawlerState {
    loop {
        let status = catalog.crawler_state(handle).await.unwrap();
        if status.state.is_terminal() {
            return status.state;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}

// ============================================================================
// LocalCatalog
// ============================================================================

#[tokio::test]
async fn test_head_object() {
    let (_, catalog) = seeded_catalog().await;
    let size = catalog
        .head_object("raw-json/booking-full-hotel.json")
        .await
        .unwrap();
    assert!(size.is_some_and(|s| s > 0));

    let missing = catalog.head_object("raw-json/nope.json").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_ensure_database_is_idempotent() {
    let (_, catalog) = seeded_catalog().await;
    catalog.ensure_database("tourism_db").await.unwrap();
    // Second call is success, not an error
    catalog.ensure_database("tourism_db").await.unwrap();
}

#[tokio::test]
async fn test_put_crawler_updates_in_place() {
    let (_, catalog) = seeded_catalog().await;
    let handle = catalog.put_crawler(crawler_spec()).await.unwrap();
    assert_eq!(handle.name, "test-crawler");

    let mut updated = crawler_spec();
    updated.table_prefix = "yogya_".to_string();
    let handle2 = catalog.put_crawler(updated).await.unwrap();
    assert_eq!(handle, handle2);
}

#[tokio::test]
async fn test_crawl_registers_tables() {
    let (_, catalog) = seeded_catalog().await;
    catalog.ensure_database("tourism_db").await.unwrap();
    let handle = catalog.put_crawler(crawler_spec()).await.unwrap();
    catalog.start_crawler(&handle).await.unwrap();

    assert_eq!(wait_for_terminal(&catalog, &handle).await, CrawlerState::Ready);

    let tables = catalog.list_tables("tourism_db").await.unwrap();
    assert_eq!(tables.len(), 2);

    let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "tourism_booking_full_hotel",
            "tourism_geospatial_attractions"
        ]
    );

    let hotel_table = &tables[0];
    assert_eq!(hotel_table.row_count, Some(2));
    assert!(hotel_table.file_size.is_some());
    let rating = hotel_table
        .columns
        .iter()
        .find(|c| c.name == "rating")
        .unwrap();
    assert_eq!(rating.col_type, "struct<double:double>");

    let status = catalog.crawler_state(&handle).await.unwrap();
    let last = status.last_crawl.unwrap();
    assert_eq!(last.tables_created, 2);
    assert_eq!(last.tables_updated, 0);
}

#[tokio::test]
async fn test_recrawl_updates_existing_tables() {
    let (_, catalog) = seeded_catalog().await;
    let handle = catalog.put_crawler(crawler_spec()).await.unwrap();

    catalog.start_crawler(&handle).await.unwrap();
    wait_for_terminal(&catalog, &handle).await;
    catalog.start_crawler(&handle).await.unwrap();
    wait_for_terminal(&catalog, &handle).await;

    let last = catalog
        .crawler_state(&handle)
        .await
        .unwrap()
        .last_crawl
        .unwrap();
    assert_eq!(last.tables_created, 0);
    assert_eq!(last.tables_updated, 2);
}

#[tokio::test]
async fn test_crawl_skips_excluded_and_unparseable_objects() {
    let store = Arc::new(InMemory::new());
    put_json(&store, "raw-json/good.json", json!([{"a": 1}])).await;
    store
        .put(
            &ObjectPath::from("raw-json/scratch.tmp"),
            bytes::Bytes::from_static(b"ignore me").into(),
        )
        .await
        .unwrap();
    store
        .put(
            &ObjectPath::from("raw-json/broken.json"),
            bytes::Bytes::from_static(b"{not json").into(),
        )
        .await
        .unwrap();

    let catalog = LocalCatalog::new(store as Arc<dyn ObjectStore>);
    let handle = catalog.put_crawler(crawler_spec()).await.unwrap();
    catalog.start_crawler(&handle).await.unwrap();
    wait_for_terminal(&catalog, &handle).await;

    let tables = catalog.list_tables("tourism_db").await.unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].name, "tourism_good");
}

#[tokio::test]
async fn test_read_records_roundtrip() {
    let (_, catalog) = seeded_catalog().await;
    let handle = catalog.put_crawler(crawler_spec()).await.unwrap();
    catalog.start_crawler(&handle).await.unwrap();
    wait_for_terminal(&catalog, &handle).await;

    let records = catalog
        .read_records("tourism_db", "tourism_booking_full_hotel")
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], json!("Tentrem"));

    let err = catalog
        .read_records("tourism_db", "missing_table")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing_table"));
}

#[tokio::test]
async fn test_jsonl_sources_are_supported() {
    let store = Arc::new(InMemory::new());
    store
        .put(
            &ObjectPath::from("raw-json/lines.json"),
            bytes::Bytes::from_static(b"{\"a\": 1}\n\n{\"a\": 2}\n").into(),
        )
        .await
        .unwrap();

    let catalog = LocalCatalog::new(store as Arc<dyn ObjectStore>);
    let handle = catalog.put_crawler(crawler_spec()).await.unwrap();
    catalog.start_crawler(&handle).await.unwrap();
    wait_for_terminal(&catalog, &handle).await;

    let records = catalog
        .read_records("tourism_db", "tourism_lines")
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_starting_undefined_crawler_fails() {
    let (_, catalog) = seeded_catalog().await;
    let handle = CrawlerHandle {
        name: "ghost".to_string(),
    };
    assert!(catalog.start_crawler(&handle).await.is_err());
    assert!(catalog.crawler_state(&handle).await.is_err());
}

// ============================================================================
// CrawlerController
// ============================================================================

#[tokio::test]
async fn test_verify_sources_reports_missing_files() {
    let (_, catalog) = seeded_catalog().await;
    let controller = CrawlerController::new(Arc::new(catalog), test_config());

    let checks = controller.verify_sources().await.unwrap();
    assert_eq!(checks.len(), 5);
    assert!(checks[&SourceId::BookingHotels].found);
    assert!(checks[&SourceId::BookingHotels].size.is_some());
    assert!(!checks[&SourceId::BookingReviews].found);
}

#[tokio::test]
async fn test_define_crawler_dedupes_targets() {
    let (_, catalog) = seeded_catalog().await;
    let catalog = Arc::new(catalog);
    let controller = CrawlerController::new(catalog.clone(), test_config());

    let handle = controller.define_crawler().await.unwrap();
    assert_eq!(handle.name, "test-crawler");
    // All five sources live in raw-json/, so one target; re-defining is fine
    controller.define_crawler().await.unwrap();
}

#[tokio::test]
async fn test_run_crawler_blocks_until_ready() {
    let (_, catalog) = seeded_catalog().await;
    let controller = CrawlerController::new(Arc::new(catalog), test_config());

    let handle = controller.define_crawler().await.unwrap();
    let state = controller.run_crawler(&handle).await.unwrap();
    assert_eq!(state, CrawlerState::Ready);

    let tables = controller.discovered_tables().await.unwrap();
    assert_eq!(tables.len(), 2);
}

#[tokio::test]
async fn test_setup_writes_report_artifact() {
    let (_, catalog) = seeded_catalog().await;
    let controller = CrawlerController::new(Arc::new(catalog), test_config());
    let dir = tempfile::tempdir().unwrap();

    let report = controller.setup(dir.path()).await.unwrap();
    assert_eq!(report.database_name, "tourism_db");
    assert_eq!(report.total_tables, 2);
    assert!(!report.discovery_timestamp.is_empty());

    // Exactly one timestamped report file, parseable back into the shape
    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(files[0].as_ref().unwrap().path()).unwrap();
    let parsed: CatalogReport = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.total_tables, 2);
    assert_eq!(parsed.tables.len(), 2);
    assert!(parsed.tables.iter().all(|t| !t.columns.is_empty()));
}
