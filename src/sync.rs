//! The end-to-end run: load the page, parse it, publish the launches.

use anyhow::{Context, Result};

use crate::auth::Authenticator;
use crate::calendar::{CalendarError, CalendarPublisher, GoogleCalendar, NewEvent};
use crate::config::{CalendarSettings, SyncConfig};
use crate::fetch::PageFetcher;
use crate::models::LaunchRecord;
use crate::schedule::{parse_schedule, Clock, CountingSink, TracingSink};

/// Outcome of publishing a run's launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// `None` for a dry run.
    pub calendar_id: Option<String>,
    pub events_created: usize,
}

/// Create the destination calendar and insert one event per launch, in order.
///
/// Stops at the first failed insert; events already created stay in place.
pub async fn publish_launches<P, I>(
    publisher: &P,
    settings: &CalendarSettings,
    launches: I,
) -> Result<SyncReport, CalendarError>
where
    P: CalendarPublisher + ?Sized,
    I: IntoIterator<Item = LaunchRecord>,
{
    let calendar = publisher
        .create_calendar(&settings.name, &settings.time_zone)
        .await?;
    tracing::info!("Created calendar: {}", calendar.summary);

    let mut events_created = 0;
    for launch in launches {
        let event = publisher
            .insert_event(&calendar.id, &NewEvent::for_launch(&launch))
            .await?;
        tracing::info!(
            "Event created: {}",
            event.html_link.as_deref().unwrap_or(event.id.as_str())
        );
        events_created += 1;
    }

    Ok(SyncReport {
        calendar_id: Some(calendar.id),
        events_created,
    })
}

/// Load and parse the configured schedule page, logging diagnostics.
pub async fn load_launches<C: Clock + ?Sized>(
    config: &SyncConfig,
    clock: &C,
) -> Result<Vec<LaunchRecord>> {
    let fetcher = PageFetcher::new().context("Failed to build HTTP client")?;
    let html = fetcher
        .load(&config.source)
        .await
        .context("Failed to load launch schedule")?;

    let mut sink = CountingSink::new(TracingSink);
    let launches = parse_schedule(&html, clock, &mut sink);
    tracing::info!(
        "Parsed {} launches ({} entries skipped, {} times defaulted)",
        launches.len(),
        sink.skipped(),
        sink.defaulted()
    );
    Ok(launches)
}

/// Fetch, parse, authenticate, and publish.
///
/// The page is loaded before authenticating so a fetch failure never leaves an
/// empty calendar behind.
pub async fn run_sync<C: Clock + ?Sized>(config: &SyncConfig, clock: &C) -> Result<SyncReport> {
    let launches = load_launches(config, clock).await?;

    if config.dry_run {
        for launch in &launches {
            tracing::info!(
                "Would publish {} | {} | {}",
                launch.datetime,
                launch.mission,
                launch.location
            );
        }
        return Ok(SyncReport {
            calendar_id: None,
            events_created: 0,
        });
    }

    let access_token = Authenticator::new(config.auth.clone())
        .access_token()
        .await
        .context("Failed to authenticate with Google")?;
    let calendar = GoogleCalendar::new(config.calendar_api.clone(), access_token);

    publish_launches(&calendar, &config.calendar, launches)
        .await
        .context("Failed to publish launches")
}
