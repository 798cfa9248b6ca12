//! Semantic Scholar graph API client

use async_trait::async_trait;
use litgraph_common::config::ProvidersConfig;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{check_status, http_client, items_at, CatalogProvider};
use crate::catalog::QueryTask;
use crate::errors::ProviderError;

const PROVIDER: &str = "semantic_scholar";

/// Fields requested for every search hit
const FIELDS: &str = "title,abstract,url,year,venue,externalIds,citationCount,authors";

/// Client for `GET {base}/graph/v1/paper/search`. This API rate limits
/// anonymous callers aggressively.
pub struct SemanticScholarClient {
    client: reqwest::Client,
    base_url: String,
}

impl SemanticScholarClient {
    pub fn new(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(PROVIDER, config)?,
            base_url: config
                .semantic_scholar_base_url
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl CatalogProvider for SemanticScholarClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip(self), fields(task = %task))]
    async fn fetch(&self, task: &QueryTask) -> Result<Vec<Value>, ProviderError> {
        let url = format!("{}/graph/v1/paper/search", self.base_url);
        let limit = task.rows.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", task.context.as_str()),
                ("limit", limit.as_str()),
                ("fields", FIELDS),
            ])
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER,
                source,
            })?;

        check_status(PROVIDER, response.status())?;

        let body: Value = response.json().await.map_err(|e| ProviderError::Decode {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

        let papers = items_at(PROVIDER, body, "/data")?;
        debug!(papers = papers.len(), "Semantic Scholar query returned");

        Ok(papers)
    }
}
