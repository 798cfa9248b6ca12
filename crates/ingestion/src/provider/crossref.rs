//! Crossref `works` API client

use async_trait::async_trait;
use litgraph_common::config::ProvidersConfig;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{check_status, http_client, items_at, CatalogProvider};
use crate::catalog::{QueryMode, QueryTask};
use crate::errors::ProviderError;

const PROVIDER: &str = "crossref";

/// Client for `GET {base}/works`
pub struct CrossrefClient {
    client: reqwest::Client,
    base_url: String,
    mailto: Option<String>,
}

impl CrossrefClient {
    pub fn new(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(PROVIDER, config)?,
            base_url: config.crossref_base_url.trim_end_matches('/').to_string(),
            mailto: config.mailto.clone(),
        })
    }

    /// Query string for a task
    fn params(&self, task: &QueryTask) -> Vec<(&'static str, String)> {
        let mut params = match task.mode() {
            QueryMode::Journal => vec![
                ("filter", format!("container-title:{}", task.context)),
                ("sort", "published".to_string()),
            ],
            QueryMode::Search => vec![
                ("query", task.context.clone()),
                ("sort", "relevance".to_string()),
            ],
        };
        params.push(("order", "desc".to_string()));
        params.push(("rows", task.rows.to_string()));

        if let Some(mailto) = &self.mailto {
            params.push(("mailto", mailto.clone()));
        }
        params
    }
}

#[async_trait]
impl CatalogProvider for CrossrefClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip(self), fields(task = %task))]
    async fn fetch(&self, task: &QueryTask) -> Result<Vec<Value>, ProviderError> {
        let url = format!("{}/works", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&self.params(task))
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

        let items = items_at(PROVIDER, body, "/message/items")?;
        debug!(items = items.len(), "Crossref query returned");

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn client(mailto: Option<&str>) -> CrossrefClient {
        let config = ProvidersConfig {
            mailto: mailto.map(String::from),
            ..ProvidersConfig::default()
        };
        CrossrefClient::new(&config).unwrap()
    }

    #[test]
    fn test_journal_params() {
        let task = QueryTask::new(Catalog::Acs, "ACS Macro Letters", 15);
        let params = client(None).params(&task);

        assert!(params.contains(&("filter", "container-title:ACS Macro Letters".to_string())));
        assert!(params.contains(&("sort", "published".to_string())));
        assert!(params.contains(&("rows", "15".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "mailto"));
    }

    #[test]
    fn test_search_params_with_mailto() {
        let task = QueryTask::new(Catalog::Springer, "polymer blend", 10);
        let params = client(Some("lab@example.org")).params(&task);

        assert!(params.contains(&("query", "polymer blend".to_string())));
        assert!(params.contains(&("sort", "relevance".to_string())));
        assert!(params.contains(&("mailto", "lab@example.org".to_string())));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ProvidersConfig {
            crossref_base_url: "http://localhost:9000/".to_string(),
            ..ProvidersConfig::default()
        };
        let client = CrossrefClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
    }
}
