use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Fixed length of a published launch event. Launches carry no duration on
/// the schedule page, so every event gets the same window.
pub const LAUNCH_WINDOW_MINUTES: i64 = 60;

/// A single upcoming launch, normalized from the schedule page.
///
/// Records are only ever built from a fully resolved listing: the datetime
/// has a concrete date and time-of-day, and both labels are non-empty and
/// trimmed. Listings that cannot satisfy that are dropped by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRecord {
    /// Launch time. Naive, but always interpreted as UTC.
    pub datetime: NaiveDateTime,
    /// Vehicle and payload, e.g. `Falcon 9 • Starlink 10-5`.
    pub mission: String,
    /// Launch site or pad.
    pub location: String,
}

impl LaunchRecord {
    /// End of the event window published for this launch.
    pub fn end(&self) -> NaiveDateTime {
        self.datetime + Duration::minutes(LAUNCH_WINDOW_MINUTES)
    }
}
