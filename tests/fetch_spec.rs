//! Page loading and the parse-only pipeline.

use axum::{http::StatusCode, routing::get, Router};
use chrono::NaiveDate;
use launch_calendar::config::{ScheduleSource, SyncConfig};
use launch_calendar::fetch::*;
use launch_calendar::schedule::FixedClock;
use launch_calendar::sync::{load_launches, run_sync};
use tempfile::TempDir;

const SCHEDULE_PAGE: &str = r#"<!DOCTYPE html>
<html><body><div class="entry-content">
  <div class="datename"><span class="launchdate">NET March 3</span>18:30 UTC</div>
  <div class="missiondata">Launch window: 1830 GMT</div>
  <div class="mission">Falcon 9 | Starlink 12-1</div>
  <div class="location">Cape Canaveral SFS, FL</div>
  <div class="datename"><span class="launchdate">TBD</span></div>
  <div class="mission">Vulcan | Dream Chaser</div>
  <div class="location">Cape Canaveral SFS, FL</div>
</div></body></html>"#;

async fn spawn_site() -> String {
    let app = Router::new()
        .route("/launch-schedule/", get(|| async { SCHEDULE_PAGE }))
        .route("/empty/", get(|| async { "  \n " }))
        .route("/gone/", get(|| async { (StatusCode::GONE, "gone") }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", address)
}

fn clock() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
}

mod page_fetcher {
    use super::*;

    #[tokio::test]
    async fn returns_the_page_body() {
        let site = spawn_site().await;

        let body = PageFetcher::new()
            .unwrap()
            .fetch(&format!("{}/launch-schedule/", site))
            .await
            .unwrap();

        assert!(body.contains("launchdate"));
    }

    #[tokio::test]
    async fn fails_on_non_success_status() {
        let site = spawn_site().await;

        let result = PageFetcher::new()
            .unwrap()
            .fetch(&format!("{}/gone/", site))
            .await;

        match result {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, StatusCode::GONE),
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn fails_on_an_empty_document() {
        let site = spawn_site().await;

        let result = PageFetcher::new()
            .unwrap()
            .fetch(&format!("{}/empty/", site))
            .await;

        assert!(matches!(result, Err(FetchError::EmptyDocument(_))));
    }

    #[tokio::test]
    async fn reads_a_saved_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schedule.html");
        std::fs::write(&path, SCHEDULE_PAGE).unwrap();

        let body = PageFetcher::new()
            .unwrap()
            .load(&ScheduleSource::File(path))
            .await
            .unwrap();

        assert_eq!(body, SCHEDULE_PAGE);
    }

    #[tokio::test]
    async fn reports_a_missing_file() {
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join("absent.html");

        let result = PageFetcher::new()
            .unwrap()
            .load(&ScheduleSource::File(missing.clone()))
            .await;

        match result {
            Err(FetchError::Io { path, .. }) => assert_eq!(path, missing.display().to_string()),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn names_an_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.html");
        std::fs::write(&path, "\n\n").unwrap();

        let result = PageFetcher::new()
            .unwrap()
            .load(&ScheduleSource::File(path.clone()))
            .await;

        match result {
            Err(FetchError::EmptyDocument(origin)) => {
                assert_eq!(origin, path.display().to_string())
            }
            other => panic!("expected EmptyDocument error, got {:?}", other),
        }
    }
}

mod pipeline {
    use super::*;

    #[tokio::test]
    async fn loads_and_parses_the_schedule() {
        let site = spawn_site().await;
        let config = SyncConfig {
            source: ScheduleSource::Url(format!("{}/launch-schedule/", site)),
            ..SyncConfig::default()
        };

        let launches = load_launches(&config, &clock()).await.unwrap();

        assert_eq!(launches.len(), 1);
        assert_eq!(
            launches[0].datetime,
            NaiveDate::from_ymd_opt(2025, 3, 3)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap()
        );
        assert_eq!(launches[0].mission, "Falcon 9 | Starlink 12-1");
    }

    #[tokio::test]
    async fn fetch_failure_aborts_the_run() {
        let site = spawn_site().await;
        let config = SyncConfig {
            source: ScheduleSource::Url(format!("{}/gone/", site)),
            dry_run: true,
            ..SyncConfig::default()
        };

        let result = run_sync(&config, &clock()).await;

        let error = result.unwrap_err();
        assert!(error.downcast_ref::<FetchError>().is_some());
    }

    #[tokio::test]
    async fn dry_run_publishes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schedule.html");
        std::fs::write(&path, SCHEDULE_PAGE).unwrap();
        let config = SyncConfig {
            source: ScheduleSource::File(path),
            dry_run: true,
            ..SyncConfig::default()
        };

        let report = run_sync(&config, &clock()).await.unwrap();

        assert_eq!(report.calendar_id, None);
        assert_eq!(report.events_created, 0);
    }
}
