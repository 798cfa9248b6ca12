//! LitGraph Common Library
//!
//! Shared code for all LitGraph crates including:
//! - Canonical article model and graph snapshot types
//! - Article store abstraction (JSON snapshot on disk)
//! - Error types and handling
//! - Configuration management
//! - Logging setup
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod store;
pub mod telemetry;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use models::{
    Article, ArticleNode, Evidence, GraphSnapshot, Relationship, RelationType, NO_ABSTRACT,
    NO_TITLE, UNSPECIFIED_AUTHORS,
};
pub use store::{ArticleStore, JsonFileStore, MemoryStore, StoreError};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default location of the persisted graph snapshot
pub const DEFAULT_STORE_PATH: &str = "data/articles.json";
