use chrono::{Duration, Utc};
use dashboard_database::Database;
use tempfile::TempDir;

async fn open_database(temp_dir: &TempDir) -> Database {
    let db_path = temp_dir.path().join("dashboard.db");
    Database::open(&db_path).await.unwrap()
}

#[tokio::test]
async fn refresh_report_stores_window_counts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let database = open_database(&temp_dir).await;

    let now = Utc::now();
    let events = &database.activity_event_queries;

    events.record_event("signup", now - Duration::hours(1)).await.unwrap();
    events.record_event("signup", now - Duration::days(3)).await.unwrap();
    events.record_event("visit", now - Duration::days(20)).await.unwrap();
    // Outside every window
    events.record_event("signup", now - Duration::days(40)).await.unwrap();
    // Not part of this report
    events.record_event("flag_created", now - Duration::hours(1)).await.unwrap();

    database
        .report_queries
        .refresh_report("index", &["signup", "visit"], now)
        .await
        .unwrap();

    let report = database
        .report_queries
        .report("index")
        .await
        .unwrap()
        .expect("report row");

    let payload: serde_json::Value = serde_json::from_str(&report.payload_json).unwrap();
    assert_eq!(payload["last_24_hours"], 1);
    assert_eq!(payload["last_7_days"], 2);
    assert_eq!(payload["last_30_days"], 3);
}

#[tokio::test]
async fn refresh_report_replaces_previous_snapshot() {
    let temp_dir = tempfile::tempdir().unwrap();
    let database = open_database(&temp_dir).await;

    let first_refresh = Utc::now() - Duration::hours(1);
    let second_refresh = Utc::now();

    database
        .report_queries
        .refresh_report("general", &["signup"], first_refresh)
        .await
        .unwrap();

    database
        .activity_event_queries
        .record_event("signup", second_refresh - Duration::hours(1))
        .await
        .unwrap();

    database
        .report_queries
        .refresh_report("general", &["signup"], second_refresh)
        .await
        .unwrap();

    let report = database
        .report_queries
        .report("general")
        .await
        .unwrap()
        .expect("report row");

    let payload: serde_json::Value = serde_json::from_str(&report.payload_json).unwrap();
    assert_eq!(payload["last_24_hours"], 1);
    assert!(report.refreshed_at > first_refresh);
}

#[tokio::test]
async fn missing_report_is_none() {
    let temp_dir = tempfile::tempdir().unwrap();
    let database = open_database(&temp_dir).await;

    let report = database.report_queries.report("moderation").await.unwrap();

    assert!(report.is_none());
}
