//! Snapshot queries
//!
//! Filters a stored snapshot by topic group and inclusive year range. Links
//! survive only when both endpoints survive.

mod topic;

pub use topic::Topic;

use chrono::{Datelike, NaiveDate};
use litgraph_common::GraphSnapshot;
use serde::Deserialize;
use tracing::{debug, warn};

/// Date format accepted in query parameters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Inclusive year bounds; an absent bound is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl YearRange {
    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        Self { start, end }
    }

    /// Build bounds from optional date parameters. Only the year of each date
    /// is used; dates that do not parse leave their bound open.
    pub fn from_dates(start: Option<&str>, end: Option<&str>) -> Self {
        Self {
            start: year_of("start_date", start),
            end: year_of("end_date", end),
        }
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start.map_or(true, |s| year >= s) && self.end.map_or(true, |e| year <= e)
    }
}

fn year_of(param: &str, value: Option<&str>) -> Option<i32> {
    let value = value.filter(|v| !v.trim().is_empty())?;
    match parse_date(value) {
        Some(date) => Some(date.year()),
        None => {
            warn!(param, value, "Ignoring unparsable date");
            None
        }
    }
}

/// Query parameters of `GET /api/articles`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleQuery {
    pub topic: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ArticleQuery {
    pub fn topic(&self) -> Topic {
        self.topic.as_deref().map(Topic::from_param).unwrap_or_default()
    }

    pub fn years(&self) -> YearRange {
        YearRange::from_dates(self.start_date.as_deref(), self.end_date.as_deref())
    }

    /// Filter `snapshot` down to the matching nodes and the links between them
    pub fn apply(&self, mut snapshot: GraphSnapshot) -> GraphSnapshot {
        let topic = self.topic();
        let years = self.years();

        if topic == Topic::All && years.is_open() {
            return snapshot;
        }

        let before = snapshot.nodes.len();
        snapshot.retain_nodes(|node| topic.matches(node) && years.contains(node.year));

        debug!(
            topic = %topic,
            start = ?years.start,
            end = ?years.end,
            before,
            after = snapshot.nodes.len(),
            links = snapshot.links.len(),
            "Snapshot filtered"
        );

        snapshot
    }
}
