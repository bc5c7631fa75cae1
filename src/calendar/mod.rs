//! Calendar publishing.
//!
//! The sync pipeline only depends on [`CalendarPublisher`]; [`GoogleCalendar`]
//! is the Calendar v3 implementation used by the binary.

mod client;
mod types;

pub use client::*;
pub use types::*;

use async_trait::async_trait;

/// Destination for launch events.
#[async_trait]
pub trait CalendarPublisher: Send + Sync {
    /// Create a new calendar and return it.
    async fn create_calendar(&self, name: &str, time_zone: &str)
        -> Result<Calendar, CalendarError>;

    /// Insert one event into a calendar and return the created event.
    async fn insert_event(&self, calendar_id: &str, event: &NewEvent)
        -> Result<Event, CalendarError>;
}
