use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::LaunchRecord;

pub const EVENT_DESCRIPTION: &str = "Space launch";
pub const EVENT_TIME_ZONE: &str = "UTC";

/// Email reminder lead time: one day.
pub const EMAIL_REMINDER_MINUTES: u32 = 24 * 60;
pub const POPUP_REMINDER_MINUTES: u32 = 10;

/// Body of a calendar insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCalendar {
    pub summary: String,
    pub time_zone: String,
}

/// A calendar as returned by the API (only the fields we read).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: DateTime<Utc>,
    pub time_zone: String,
}

impl EventDateTime {
    pub fn utc(date_time: DateTime<Utc>) -> Self {
        Self {
            date_time,
            time_zone: EVENT_TIME_ZONE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: ReminderMethod,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

impl Reminders {
    /// Email a day ahead and pop up ten minutes before liftoff.
    pub fn launch_policy() -> Self {
        Self {
            use_default: false,
            overrides: vec![
                ReminderOverride {
                    method: ReminderMethod::Email,
                    minutes: EMAIL_REMINDER_MINUTES,
                },
                ReminderOverride {
                    method: ReminderMethod::Popup,
                    minutes: POPUP_REMINDER_MINUTES,
                },
            ],
        }
    }
}

/// Body of an event insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub reminders: Reminders,
}

impl NewEvent {
    /// Build the event for a launch: titled by mission, one hour long.
    pub fn for_launch(launch: &LaunchRecord) -> Self {
        Self {
            summary: launch.mission.clone(),
            location: launch.location.clone(),
            description: EVENT_DESCRIPTION.to_string(),
            start: EventDateTime::utc(launch.datetime.and_utc()),
            end: EventDateTime::utc(launch.end().and_utc()),
            reminders: Reminders::launch_policy(),
        }
    }
}

/// A created event (only the fields we read).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub html_link: Option<String>,
}
