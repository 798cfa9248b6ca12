//! Catalog provider clients
//!
//! A provider fetches the raw items for one [`QueryTask`]. Normalization is
//! not the provider's concern; items are returned as upstream JSON.

mod crossref;
mod semantic_scholar;

pub use crossref::CrossrefClient;
pub use semantic_scholar::SemanticScholarClient;

use async_trait::async_trait;
use litgraph_common::config::ProvidersConfig;
use litgraph_common::VERSION;
use serde_json::Value;
use std::time::Duration;

use crate::catalog::QueryTask;
use crate::errors::ProviderError;

/// Fetches raw items for a query context
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Short name used in logs and metric labels
    fn name(&self) -> &'static str;

    async fn fetch(&self, task: &QueryTask) -> Result<Vec<Value>, ProviderError>;
}

/// Shared HTTP client for the catalog APIs
pub(crate) fn http_client(
    provider: &'static str,
    config: &ProvidersConfig,
) -> Result<reqwest::Client, ProviderError> {
    let user_agent = match config.mailto.as_deref() {
        Some(mailto) => format!("litgraph/{} (mailto:{})", VERSION, mailto),
        None => format!("litgraph/{}", VERSION),
    };

    reqwest::Client::builder()
        .timeout(config.timeout())
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()
        .map_err(|source| ProviderError::Transport { provider, source })
}

/// Map a response status onto the provider error taxonomy
pub(crate) fn check_status(
    provider: &'static str,
    status: reqwest::StatusCode,
) -> Result<(), ProviderError> {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited { provider });
    }
    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
        });
    }
    Ok(())
}

/// Pull the item array at `pointer` out of a response body
pub(crate) fn items_at(
    provider: &'static str,
    mut body: Value,
    pointer: &str,
) -> Result<Vec<Value>, ProviderError> {
    match body.pointer_mut(pointer).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(ProviderError::Decode {
            provider,
            message: format!("expected an array at {}, found {}", pointer, type_name(&other)),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
