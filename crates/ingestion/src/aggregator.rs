//! Provider aggregation
//!
//! Runs the task queue strictly in order: fetch, normalize, dedup. One
//! failing query never fails the run; it counts as zero results. A rate
//! limited query triggers a cooldown and is skipped, not retried.

use litgraph_common::config::ProvidersConfig;
use litgraph_common::metrics::{record_normalization, record_provider_query};
use litgraph_common::Article;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::catalog::{default_tasks, Backend, QueryTask};
use crate::dedup::Deduplicator;
use crate::errors::ProviderError;
use crate::normalizer::Normalizer;
use crate::provider::{CatalogProvider, CrossrefClient, SemanticScholarClient};

/// Pacing between queries and the rate-limit cooldown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingPolicy {
    pub crossref_delay: Duration,
    pub semantic_scholar_delay: Duration,
    pub cooldown: Duration,
}

impl PollingPolicy {
    pub fn from_config(config: &ProvidersConfig) -> Self {
        Self {
            crossref_delay: config.query_delay(),
            semantic_scholar_delay: config.semantic_scholar_delay(),
            cooldown: config.rate_limit_cooldown(),
        }
    }

    /// No waiting at all
    pub fn immediate() -> Self {
        Self {
            crossref_delay: Duration::ZERO,
            semantic_scholar_delay: Duration::ZERO,
            cooldown: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, backend: Backend) -> Duration {
        match backend {
            Backend::Crossref => self.crossref_delay,
            Backend::SemanticScholar => self.semantic_scholar_delay,
        }
    }
}

/// Result of one pass over the task queue
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Deduplicated articles in first-seen order
    pub articles: Vec<Article>,
    /// Items that failed normalization
    pub skipped: usize,
    /// Queries that failed or were rate limited
    pub failed_queries: usize,
    /// Queries attempted
    pub queries: usize,
    /// Repeats dropped by id
    pub duplicates: usize,
}

/// Sequential task queue over the registered providers
pub struct Aggregator {
    tasks: Vec<QueryTask>,
    providers: HashMap<Backend, Arc<dyn CatalogProvider>>,
    policy: PollingPolicy,
    normalizer: Normalizer,
}

impl Aggregator {
    pub fn new(tasks: Vec<QueryTask>, policy: PollingPolicy) -> Self {
        Self {
            tasks,
            providers: HashMap::new(),
            policy,
            normalizer: Normalizer::new(),
        }
    }

    /// Aggregator over the default catalog with live HTTP clients
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        Ok(Self::new(default_tasks(config), PollingPolicy::from_config(config))
            .with_provider(Backend::Crossref, Arc::new(CrossrefClient::new(config)?))
            .with_provider(
                Backend::SemanticScholar,
                Arc::new(SemanticScholarClient::new(config)?),
            ))
    }

    pub fn with_provider(mut self, backend: Backend, provider: Arc<dyn CatalogProvider>) -> Self {
        self.providers.insert(backend, provider);
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn tasks(&self) -> &[QueryTask] {
        &self.tasks
    }

    async fn fetch(&self, task: &QueryTask) -> Result<Vec<serde_json::Value>, ProviderError> {
        let backend = task.catalog.backend();
        match self.providers.get(&backend) {
            Some(provider) => {
                debug!(provider = provider.name(), task = %task, "Querying provider");
                provider.fetch(task).await
            }
            None => Err(ProviderError::Unavailable {
                backend: backend.as_str(),
            }),
        }
    }

    /// Run every task once and collect the deduplicated articles
    #[instrument(skip(self), fields(tasks = self.tasks.len()))]
    pub async fn collect(&self) -> Aggregation {
        let mut dedup = Deduplicator::new();
        let mut outcome = Aggregation::default();

        for (index, task) in self.tasks.iter().enumerate() {
            let backend = task.catalog.backend();
            let started = Instant::now();
            outcome.queries += 1;

            let pause = match self.fetch(task).await {
                Ok(items) => {
                    record_provider_query(backend.as_str(), "ok", started.elapsed().as_secs_f64());

                    let fetched = items.len();
                    let mut normalized = 0usize;
                    let mut skipped = 0usize;

                    for raw in items.into_iter().filter(|raw| task.catalog.accepts(raw)) {
                        match self.normalizer.normalize(task, raw) {
                            Ok(article) => {
                                normalized += 1;
                                dedup.push(article);
                            }
                            Err(e) => {
                                skipped += 1;
                                debug!(task = %task, error = %e, "Skipping item");
                            }
                        }
                    }

                    record_normalization(task.catalog.prefix(), normalized, skipped);
                    outcome.skipped += skipped;

                    info!(
                        task = %task,
                        fetched,
                        normalized,
                        skipped,
                        collected = dedup.kept(),
                        "Query complete"
                    );
                    self.policy.delay_for(backend)
                }
                Err(e) if e.is_rate_limited() => {
                    record_provider_query(backend.as_str(), e.outcome(), started.elapsed().as_secs_f64());
                    outcome.failed_queries += 1;
                    warn!(
                        task = %task,
                        cooldown_secs = self.policy.cooldown.as_secs(),
                        "Rate limited, cooling down and skipping query"
                    );
                    self.policy.cooldown
                }
                Err(e) => {
                    record_provider_query(backend.as_str(), e.outcome(), started.elapsed().as_secs_f64());
                    outcome.failed_queries += 1;
                    warn!(task = %task, error = %e, "Query failed, treating as empty");
                    self.policy.delay_for(backend)
                }
            };

            let is_last = index + 1 == self.tasks.len();
            if !is_last && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }

        outcome.duplicates = dedup.duplicates();
        outcome.articles = dedup.into_articles();

        info!(
            articles = outcome.articles.len(),
            skipped = outcome.skipped,
            failed_queries = outcome.failed_queries,
            duplicates = outcome.duplicates,
            "Aggregation finished"
        );

        outcome
    }
}
