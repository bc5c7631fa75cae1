//! Calendar client and publishing tests against an in-process Calendar API.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use launch_calendar::calendar::*;
use launch_calendar::config::CalendarSettings;
use launch_calendar::models::LaunchRecord;
use launch_calendar::sync::publish_launches;
use serde_json::{json, Value};

const TOKEN: &str = "test-access-token";
const CALENDAR_ID: &str = "launches@group.calendar.google.com";

/// Requests seen by the fake API: (calendar id or "", body).
#[derive(Clone, Default)]
struct Recorded {
    calendars: Arc<Mutex<Vec<Value>>>,
    events: Arc<Mutex<Vec<(String, Value)>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == format!("Bearer {}", TOKEN))
}

async fn create_calendar(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let summary = body["summary"].clone();
    recorded.calendars.lock().unwrap().push(body);
    Ok(Json(json!({ "id": CALENDAR_ID, "summary": summary, "kind": "calendar#calendar" })))
}

async fn insert_event(
    State(recorded): State<Recorded>,
    Path(calendar_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, String::new()));
    }
    if calendar_id != CALENDAR_ID {
        return Err((StatusCode::NOT_FOUND, "calendar not found".to_string()));
    }
    if body["summary"] == "reject me" {
        return Err((StatusCode::BAD_REQUEST, "invalid event".to_string()));
    }
    let mut events = recorded.events.lock().unwrap();
    events.push((calendar_id, body));
    let id = format!("event{}", events.len());
    Ok(Json(json!({
        "id": id,
        "htmlLink": format!("https://calendar.example/event?eid={}", id),
    })))
}

/// Serve the fake API on an ephemeral port and return its base URL.
async fn spawn_api(recorded: Recorded) -> String {
    let app = Router::new()
        .route("/calendar/v3/calendars", post(create_calendar))
        .route("/calendar/v3/calendars/{id}/events", post(insert_event))
        .with_state(recorded);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/calendar/v3", address)
}

fn launch(day: u32, mission: &str) -> LaunchRecord {
    LaunchRecord {
        datetime: NaiveDate::from_ymd_opt(2026, 3, day)
            .and_then(|d| d.and_hms_opt(18, 30, 0))
            .unwrap(),
        mission: mission.to_string(),
        location: "Vandenberg SFB, CA".to_string(),
    }
}

mod google_calendar {
    use super::*;

    #[tokio::test]
    async fn creates_a_calendar() {
        let recorded = Recorded::default();
        let client = GoogleCalendar::new(spawn_api(recorded.clone()).await, TOKEN);

        let calendar = client
            .create_calendar("Vandenberg Launch Schedule", "UTC")
            .await
            .expect("create calendar");

        assert_eq!(calendar.id, CALENDAR_ID);
        assert_eq!(calendar.summary, "Vandenberg Launch Schedule");
        assert_eq!(
            recorded.calendars.lock().unwrap()[0],
            json!({ "summary": "Vandenberg Launch Schedule", "timeZone": "UTC" })
        );
    }

    #[tokio::test]
    async fn inserts_an_event_into_an_encoded_calendar_id() {
        let recorded = Recorded::default();
        let client = GoogleCalendar::new(spawn_api(recorded.clone()).await, TOKEN);

        let event = client
            .insert_event(CALENDAR_ID, &NewEvent::for_launch(&launch(3, "Falcon 9 | NROL")))
            .await
            .expect("insert event");

        assert_eq!(event.id, "event1");
        assert!(event.html_link.is_some());

        let events = recorded.events.lock().unwrap();
        let (calendar_id, body) = &events[0];
        assert_eq!(calendar_id, CALENDAR_ID);
        assert_eq!(body["summary"], "Falcon 9 | NROL");
        assert_eq!(body["start"]["dateTime"], "2026-03-03T18:30:00Z");
        assert_eq!(body["end"]["dateTime"], "2026-03-03T19:30:00Z");
        assert_eq!(body["reminders"]["overrides"][0]["minutes"], 1440);
    }

    #[tokio::test]
    async fn maps_unauthorized() {
        let client = GoogleCalendar::new(spawn_api(Recorded::default()).await, "wrong-token");

        let result = client.create_calendar("Launches", "UTC").await;

        assert!(matches!(result, Err(CalendarError::Unauthorized)));
    }

    #[tokio::test]
    async fn maps_not_found_with_body() {
        let client = GoogleCalendar::new(spawn_api(Recorded::default()).await, TOKEN);

        let result = client
            .insert_event("someone-else@example.com", &NewEvent::for_launch(&launch(3, "M")))
            .await;

        match result {
            Err(CalendarError::NotFound(body)) => assert_eq!(body, "calendar not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}

mod publish {
    use super::*;

    #[tokio::test]
    async fn creates_one_calendar_and_one_event_per_launch_in_order() {
        let recorded = Recorded::default();
        let client = GoogleCalendar::new(spawn_api(recorded.clone()).await, TOKEN);
        let settings = CalendarSettings::default();

        let report = publish_launches(
            &client,
            &settings,
            vec![launch(3, "First"), launch(1, "Second")],
        )
        .await
        .expect("publish");

        assert_eq!(report.calendar_id.as_deref(), Some(CALENDAR_ID));
        assert_eq!(report.events_created, 2);
        assert_eq!(recorded.calendars.lock().unwrap().len(), 1);

        let summaries: Vec<Value> = recorded
            .events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| body["summary"].clone())
            .collect();
        assert_eq!(summaries, vec![json!("First"), json!("Second")]);
    }

    #[tokio::test]
    async fn zero_launches_still_creates_an_empty_calendar() {
        let recorded = Recorded::default();
        let client = GoogleCalendar::new(spawn_api(recorded.clone()).await, TOKEN);

        let report = publish_launches(&client, &CalendarSettings::default(), Vec::new())
            .await
            .expect("publish");

        assert_eq!(report.events_created, 0);
        assert_eq!(recorded.calendars.lock().unwrap().len(), 1);
        assert!(recorded.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stops_at_the_first_failed_insert() {
        let recorded = Recorded::default();
        let client = GoogleCalendar::new(spawn_api(recorded.clone()).await, TOKEN);

        let result = publish_launches(
            &client,
            &CalendarSettings::default(),
            vec![launch(1, "ok"), launch(2, "reject me"), launch(3, "never sent")],
        )
        .await;

        assert!(matches!(result, Err(CalendarError::BadRequest(_))));
        assert_eq!(recorded.events.lock().unwrap().len(), 1);
    }
}
