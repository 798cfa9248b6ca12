//! LitGraph ingestion
//!
//! Polls the catalog providers, normalizes their items into canonical
//! articles, deduplicates by id and folds the result into the stored graph.
//!
//! - [`catalog`]: fixed provider/journal/query task list
//! - [`provider`]: HTTP clients behind the [`CatalogProvider`] trait
//! - [`normalizer`] and [`identity`]: raw item to [`Article`](litgraph_common::Article)
//! - [`aggregator`]: sequential task queue with pacing and cooldown
//! - [`pipeline`]: one full update cycle against an article store

pub mod aggregator;
pub mod catalog;
pub mod dedup;
pub mod errors;
pub mod identity;
pub mod normalizer;
pub mod pipeline;
pub mod provider;

pub use aggregator::{Aggregation, Aggregator, PollingPolicy};
pub use catalog::{default_tasks, Backend, Catalog, QueryMode, QueryTask};
pub use dedup::Deduplicator;
pub use errors::{NormalizeError, ProviderError, UpdateError};
pub use normalizer::Normalizer;
pub use pipeline::{UpdatePipeline, UpdateRange, UpdateReport};
pub use provider::CatalogProvider;
