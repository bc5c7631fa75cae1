use std::fmt;

/// How a diagnostic affected the listing it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The listing was dropped; no record was emitted for it.
    EntrySkipped,
    /// A field fell back to a default; the record was still emitted.
    FieldDefaulted,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntrySkipped => "entry_skipped",
            Self::FieldDefaulted => "field_defaulted",
        }
    }
}

/// Something the schedule parser had to skip or patch up.
///
/// Every variant carries the raw text that caused it so format drift on the
/// source page can be traced back to a concrete listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A date block without a usable date marker.
    MissingDateMarker,
    /// The date text matched neither `Month Day, Year` nor `Month Day`.
    UnrecognizedDate { date: String },
    /// No mission block followed the date block.
    MissingMission { date: String },
    /// No location block followed the mission block.
    MissingLocation { date: String },
    /// No time text next to the date marker; midnight UTC was used.
    MissingTime { date: String },
    /// Time text that is not `HH:MM UTC`; midnight UTC was used.
    UnrecognizedTime { date: String, time: String },
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::MissingDateMarker
            | Self::UnrecognizedDate { .. }
            | Self::MissingMission { .. }
            | Self::MissingLocation { .. } => DiagnosticKind::EntrySkipped,
            Self::MissingTime { .. } | Self::UnrecognizedTime { .. } => {
                DiagnosticKind::FieldDefaulted
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDateMarker => write!(f, "Date marker not found in launch block"),
            Self::UnrecognizedDate { date } => write!(f, "Date format not recognized: {}", date),
            Self::MissingMission { date } => {
                write!(f, "Mission element not found for date: {}", date)
            }
            Self::MissingLocation { date } => {
                write!(f, "Location element not found for date: {}", date)
            }
            Self::MissingTime { date } => {
                write!(f, "No time given for date: {}, defaulting to 00:00 UTC", date)
            }
            Self::UnrecognizedTime { time, .. } => write!(
                f,
                "Time format not recognized: {}, defaulting to 00:00 UTC",
                time
            ),
        }
    }
}
