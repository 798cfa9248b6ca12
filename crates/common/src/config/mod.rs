//! Configuration management for LitGraph services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (`config/default`, `config/{APP_ENV}`, `config/local`,
//!   any format the `config` crate reads)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Snapshot store configuration
    pub store: StoreConfig,

    /// External catalog providers
    pub providers: ProvidersConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,

    /// Inbound rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Request timeout in seconds. Update requests poll every provider
    /// sequentially, so this is generous.
    pub request_timeout_secs: u64,

    /// Shutdown timeout in seconds
    pub shutdown_timeout_secs: u64,

    /// Maximum concurrent requests
    pub max_concurrent_requests: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON graph snapshot
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Crossref REST API base URL
    pub crossref_base_url: String,

    /// Semantic Scholar Graph API base URL
    pub semantic_scholar_base_url: String,

    /// Contact address sent to Crossref (polite pool)
    pub mailto: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Delay after each Crossref-backed query, in milliseconds
    pub query_delay_ms: u64,

    /// Delay after each Semantic Scholar query, in milliseconds
    pub semantic_scholar_delay_ms: u64,

    /// Cooldown after a rate-limit response, in seconds
    pub rate_limit_cooldown_secs: u64,

    /// Rows requested per query for each catalog
    pub rows: CatalogRows,
}

/// Number of records requested per query, per catalog
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogRows {
    pub acs: u32,
    pub rsc: u32,
    pub springer: u32,
    pub wiley: u32,
    pub semantic_scholar: u32,
    pub pubmed_like: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error) or a full EnvFilter directive
    pub log_level: String,

    /// Enable JSON logging
    pub json_logging: bool,

    /// Expose Prometheus metrics on /metrics
    pub metrics_enabled: bool,

    /// Service name for tracing
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests per second (global)
    pub requests_per_second: u32,

    /// Burst capacity
    pub burst: u32,

    /// Enable rate limiting
    pub enabled: bool,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_request_timeout() -> u64 { 600 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_max_concurrent() -> usize { 100 }
fn default_store_path() -> PathBuf { PathBuf::from(crate::DEFAULT_STORE_PATH) }
fn default_crossref_base_url() -> String { "https://api.crossref.org".to_string() }
fn default_semantic_scholar_base_url() -> String { "https://api.semanticscholar.org".to_string() }
fn default_provider_timeout() -> u64 { 30 }
fn default_query_delay() -> u64 { 1000 }
fn default_semantic_scholar_delay() -> u64 { 2000 }
fn default_cooldown() -> u64 { 60 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_enabled() -> bool { true }
fn default_service_name() -> String { "litgraph".to_string() }
fn default_rate_limit() -> u32 { 50 }
fn default_burst() -> u32 { 100 }
fn default_enabled() -> bool { false }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            max_concurrent_requests: default_max_concurrent(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            crossref_base_url: default_crossref_base_url(),
            semantic_scholar_base_url: default_semantic_scholar_base_url(),
            mailto: None,
            timeout_secs: default_provider_timeout(),
            query_delay_ms: default_query_delay(),
            semantic_scholar_delay_ms: default_semantic_scholar_delay(),
            rate_limit_cooldown_secs: default_cooldown(),
            rows: CatalogRows::default(),
        }
    }
}

impl Default for CatalogRows {
    fn default() -> Self {
        Self {
            acs: 15,
            rsc: 12,
            springer: 10,
            wiley: 12,
            semantic_scholar: 8,
            pubmed_like: 8,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_enabled: default_metrics_enabled(),
            service_name: default_service_name(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_rate_limit(),
            burst: default_burst(),
            enabled: default_enabled(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__STORE__PATH=/var/lib/litgraph/articles.json
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

impl ProvidersConfig {
    /// Per-request timeout for provider calls
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay inserted after each Crossref-backed query
    pub fn query_delay(&self) -> Duration {
        Duration::from_millis(self.query_delay_ms)
    }

    /// Delay inserted after each Semantic Scholar query
    pub fn semantic_scholar_delay(&self) -> Duration {
        Duration::from_millis(self.semantic_scholar_delay_ms)
    }

    /// Wait applied after a provider answers with a rate-limit status
    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_limit_cooldown_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.store.path, PathBuf::from("data/articles.json"));
        assert_eq!(config.providers.rows.acs, 15);
        assert_eq!(config.providers.rows.pubmed_like, 8);
    }

    #[test]
    fn test_provider_durations() {
        let providers = ProvidersConfig::default();
        assert_eq!(providers.timeout(), Duration::from_secs(30));
        assert_eq!(providers.query_delay(), Duration::from_secs(1));
        assert_eq!(providers.semantic_scholar_delay(), Duration::from_secs(2));
        assert_eq!(providers.rate_limit_cooldown(), Duration::from_secs(60));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("litgraph.toml");
        std::fs::write(
            &path,
            "[store]\npath = \"/var/lib/litgraph/articles.json\"\n\n[providers.rows]\nacs = 3\n",
        )
        .unwrap();

        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();

        assert_eq!(config.store.path, PathBuf::from("/var/lib/litgraph/articles.json"));
        assert_eq!(config.providers.rows.acs, 3);
        assert_eq!(config.providers.rows.rsc, 12);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_partial_section_falls_back_to_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"providers": {"timeout_secs": 5}}"#)
            .unwrap();
        assert_eq!(config.providers.timeout_secs, 5);
        assert_eq!(config.providers.query_delay_ms, 1000);
        assert_eq!(config.server.port, 5000);
    }
}
