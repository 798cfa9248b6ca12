//! Update pipeline
//!
//! One update cycle: load the stored snapshot, aggregate the providers, append
//! the genuinely new articles, backfill URLs, rebuild the full graph and save.

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use litgraph_common::metrics::record_update;
use litgraph_common::{Article, ArticleStore};
use litgraph_graph::{parse_date, GraphBuilder};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::aggregator::Aggregator;
use crate::dedup::new_articles;
use crate::errors::UpdateError;

/// Requested update window. Providers are always polled for their newest
/// items, so the window only labels the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl UpdateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, UpdateError> {
        if start > end {
            return Err(UpdateError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse the `start_date`/`end_date` parameters; both are required
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, UpdateError> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());

        let (Some(start), Some(end)) = (start, end) else {
            return Err(UpdateError::MissingDates);
        };

        let parse = |field: &'static str, value: &str| {
            parse_date(value).ok_or_else(|| UpdateError::InvalidDate {
                field,
                value: value.to_string(),
            })
        };

        Self::new(parse("start_date", start)?, parse("end_date", end)?)
    }

    /// The `days` days up to today
    pub fn last_days(days: i64) -> Self {
        let end = Utc::now().date_naive();
        Self {
            start: end - ChronoDuration::days(days.max(0)),
            end,
        }
    }
}

/// Outcome of one update cycle
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub run_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Newly appended articles
    pub added: usize,
    /// Corpus size after the update
    pub total_articles: usize,
    /// Distinct source names of the added articles
    pub sources: Vec<String>,
    /// Items dropped by normalization
    pub skipped: usize,
    pub failed_queries: usize,
    pub links: usize,
    pub duration_ms: u64,
}

impl UpdateReport {
    pub fn message(&self) -> String {
        format!(
            "Added {} new articles from {} to {}",
            self.added, self.start_date, self.end_date
        )
    }
}

/// Runs update cycles against one store
pub struct UpdatePipeline {
    aggregator: Aggregator,
    store: Arc<dyn ArticleStore>,
    builder: GraphBuilder,
}

impl UpdatePipeline {
    pub fn new(aggregator: Aggregator, store: Arc<dyn ArticleStore>) -> Self {
        Self {
            aggregator,
            store,
            builder: GraphBuilder::new(),
        }
    }

    /// Run one update cycle.
    ///
    /// Not safe to run concurrently against the same store; callers serialize.
    #[instrument(skip(self), fields(start = %range.start, end = %range.end))]
    pub async fn run(&self, range: UpdateRange) -> Result<UpdateReport, UpdateError> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        info!(%run_id, "Starting article update");

        let existing = self.store.load().await?;
        let mut corpus: Vec<Article> = existing.nodes.into_iter().map(Article::from).collect();

        let aggregation = self.aggregator.collect().await;

        let fresh = new_articles(corpus.iter().map(|a| a.id.as_str()), aggregation.articles);
        let sources: BTreeSet<String> = fresh.iter().map(|a| a.source.clone()).collect();
        let added = fresh.len();
        corpus.extend(fresh);

        for article in &mut corpus {
            article.resolve_url();
        }

        let (snapshot, stats) = self.builder.build(&corpus);
        self.store.save(&snapshot).await?;

        let elapsed = started.elapsed();
        record_update(elapsed.as_secs_f64(), added);

        let report = UpdateReport {
            run_id,
            start_date: range.start,
            end_date: range.end,
            added,
            total_articles: corpus.len(),
            sources: sources.into_iter().collect(),
            skipped: aggregation.skipped,
            failed_queries: aggregation.failed_queries,
            links: stats.links,
            duration_ms: elapsed.as_millis() as u64,
        };

        info!(
            %run_id,
            added = report.added,
            total = report.total_articles,
            links = report.links,
            skipped = report.skipped,
            failed_queries = report.failed_queries,
            "Article update finished"
        );

        Ok(report)
    }
}
