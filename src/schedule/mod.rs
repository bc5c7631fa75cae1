//! Launch schedule parsing.
//!
//! Parsing runs in two passes over the schedule page:
//!
//! 1. **Grouping** ([`Schedule::parse`]): every `div.datename` block starts a
//!    candidate entry. The entry collects the `span.launchdate` text inside
//!    the block, the bare text node right after that span (the launch time,
//!    when the page gives one), and the first `div.mission` and `div.location`
//!    blocks among the following siblings, stopping at the next date block.
//! 2. **Resolution** ([`Schedule::into_records`]): each candidate is checked
//!    and normalized on its own into a [`LaunchRecord`], or dropped with a
//!    [`Diagnostic`].
//!
//! Nothing here touches the network, the wall clock, or global logging state.
//! The current year comes in as an argument (or through a [`Clock`]) and
//! diagnostics go to a caller-supplied [`DiagnosticSink`].

mod clock;
mod resolve;
mod sink;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

pub use clock::*;
pub use resolve::{parse_date, parse_time, strip_qualifier};
pub use sink::*;

use crate::models::LaunchRecord;

static DATE_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.datename").expect("date block selector is valid"));
static DATE_MARKER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.launchdate").expect("date marker selector is valid"));

const DATE_BLOCK_CLASS: &str = "datename";
const MISSION_CLASS: &str = "mission";
const LOCATION_CLASS: &str = "location";

/// The raw, unvalidated pieces of one launch listing.
///
/// Text fields are trimmed; blank text is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateEntry {
    pub date: Option<String>,
    pub time: Option<String>,
    pub mission: Option<String>,
    pub location: Option<String>,
}

impl CandidateEntry {
    fn from_block(block: ElementRef<'_>) -> Self {
        let marker = block.select(&DATE_MARKER).next();
        let date = marker.and_then(|m| non_blank(element_text(m)));
        let time = marker.and_then(trailing_text);

        let mut following = following_blocks(block);
        let mission = following.by_ref().find(|el| is_block(el, MISSION_CLASS));
        let location = mission.and_then(|_| following.find(|el| is_block(el, LOCATION_CLASS)));

        Self {
            date,
            time,
            mission: mission.and_then(|el| non_blank(element_text(el))),
            location: location.and_then(|el| non_blank(element_text(el))),
        }
    }
}

/// A schedule page split into candidate entries, in document order.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<CandidateEntry>,
}

impl Schedule {
    /// Run the grouping pass over an HTML document.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let entries = document
            .select(&DATE_BLOCK)
            .map(CandidateEntry::from_block)
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CandidateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every candidate into a launch record, lazily and in order.
    ///
    /// Year-less dates are placed in `current_year`. Entries that cannot be
    /// resolved are reported to `sink` and left out of the sequence.
    pub fn into_records<'s, S>(
        self,
        current_year: i32,
        sink: &'s mut S,
    ) -> impl Iterator<Item = LaunchRecord> + 's
    where
        S: DiagnosticSink + ?Sized,
    {
        self.entries
            .into_iter()
            .filter_map(move |entry| resolve::resolve(entry, current_year, &mut *sink))
    }
}

/// Parse a schedule page into launch records.
pub fn parse_schedule<C, S>(html: &str, clock: &C, sink: &mut S) -> Vec<LaunchRecord>
where
    C: Clock + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let schedule = Schedule::parse(html);
    tracing::debug!("Found {} candidate launch entries", schedule.len());
    schedule.into_records(clock.current_year(), sink).collect()
}

/// Element siblings after `block`, up to (not including) the next date block.
fn following_blocks<'a>(block: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    block
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|el| !is_block(el, DATE_BLOCK_CLASS))
}

fn is_block(el: &ElementRef<'_>, class: &str) -> bool {
    let element = el.value();
    element.name() == "div" && element.classes().any(|c| c == class)
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// The text node directly after the date marker, if there is one.
fn trailing_text(marker: ElementRef<'_>) -> Option<String> {
    let sibling = marker.next_sibling()?;
    let text = sibling.value().as_text()?;
    non_blank(text.trim().to_string())
}

fn non_blank(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
