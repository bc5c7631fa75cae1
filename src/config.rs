//! Run configuration.
//!
//! Every value has a default matching the public Spaceflight Now schedule and
//! Google Calendar; the binary overrides them from flags or `LAUNCH_CALENDAR_*`
//! environment variables.

use std::path::PathBuf;

pub const DEFAULT_SCHEDULE_URL: &str = "https://spaceflightnow.com/launch-schedule/";
pub const DEFAULT_CALENDAR_NAME: &str = "Vandenberg Launch Schedule";
pub const DEFAULT_TIME_ZONE: &str = "UTC";
pub const DEFAULT_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
pub const DEFAULT_TOKEN_PATH: &str = "token.json";
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Where the schedule page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSource {
    Url(String),
    File(PathBuf),
}

impl Default for ScheduleSource {
    fn default() -> Self {
        Self::Url(DEFAULT_SCHEDULE_URL.to_string())
    }
}

/// The destination calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSettings {
    /// Summary of the calendar created on each run.
    pub name: String,
    /// IANA zone the calendar is created in.
    pub time_zone: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_CALENDAR_NAME.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

/// OAuth2 file locations and scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Client secrets downloaded from the Google Cloud console.
    pub credentials_path: PathBuf,
    /// Cached authorized-user token, rewritten after every refresh.
    pub token_path: PathBuf,
    pub scopes: Vec<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            scopes: vec![CALENDAR_SCOPE.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub source: ScheduleSource,
    pub calendar: CalendarSettings,
    pub auth: AuthSettings,
    /// Base URL of the Calendar v3 API.
    pub calendar_api: String,
    /// Parse and log, but publish nothing.
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source: ScheduleSource::default(),
            calendar: CalendarSettings::default(),
            auth: AuthSettings::default(),
            calendar_api: DEFAULT_CALENDAR_API.to_string(),
            dry_run: false,
        }
    }
}
