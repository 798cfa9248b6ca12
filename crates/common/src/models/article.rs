//! Canonical article and its persisted node view

use chrono::Datelike;
use serde::{Deserialize, Deserializer, Serialize};

/// Author placeholder for PubMed-like items whose provider lists no authors.
/// Compared like any other name when inferring co-authorship.
pub const UNSPECIFIED_AUTHORS: &str = "Authors not specified";

/// Abstract placeholder for items without an abstract
pub const NO_ABSTRACT: &str = "No abstract available";

/// Title placeholder for items without a title field
pub const NO_TITLE: &str = "No title";

/// Canonical article produced by the normalizer.
///
/// `id` is the identity: two articles with equal ids are the same entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    /// Namespaced identifier, e.g. `acs_10.1021/acs.macromol.4c00001`
    pub id: String,

    pub title: String,

    /// Display abstract (first 500 characters plus ellipsis)
    pub abstract_text: String,

    /// Untruncated abstract
    pub full_abstract: String,

    pub year: i32,

    /// Journal or venue name
    pub journal: String,

    pub doi: Option<String>,

    /// Ordered author display names
    pub authors: Vec<String>,

    /// Topical tags assigned at normalization time
    pub keywords: Vec<String>,

    /// Query or journal string that produced this hit
    pub search_keywords: Vec<String>,

    /// Provider-reported citation count, floored at 1
    pub citation_count: u32,

    /// Provider display name, e.g. "ACS Publications"
    pub source: String,

    /// Resolved landing page; empty only before [`Article::resolve_url`]
    pub url: String,

    /// Raw provider item, kept for diagnostics and never persisted
    pub raw: Option<serde_json::Value>,
}

impl Article {
    /// Compute the landing URL for this article without mutating it.
    ///
    /// Precedence: existing url, DOI, PubMed/arXiv id embedded in the
    /// canonical id, and finally a scholar search on the title.
    pub fn resolved_url(&self) -> String {
        if !self.url.is_empty() {
            return self.url.clone();
        }

        if let Some(doi) = self.doi.as_deref().filter(|d| !d.is_empty()) {
            return format!("https://doi.org/{}", doi);
        }

        if let Some(pmid) = self.id.strip_prefix("pubmed_").filter(|rest| !rest.starts_with("like_")) {
            return format!("https://pubmed.ncbi.nlm.nih.gov/{}/", pmid);
        }

        if let Some(arxiv_id) = self.id.strip_prefix("arxiv_") {
            return format!("https://arxiv.org/abs/{}", arxiv_id);
        }

        format!(
            "https://scholar.google.com/scholar?q={}",
            urlencoding::encode(&self.title)
        )
    }

    /// Backfill `url` in place. Resolving an already-resolved article is a no-op.
    pub fn resolve_url(&mut self) {
        if self.url.is_empty() {
            self.url = self.resolved_url();
        }
    }

    /// Publication year rendered for display
    pub fn published(&self) -> String {
        self.year.to_string()
    }
}

/// Article view stored in the snapshot and returned by the API.
///
/// Older snapshots may carry `null` where a value is expected (a Semantic
/// Scholar hit without a year, for instance); those read as the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleNode {
    pub id: String,

    pub title: String,

    #[serde(rename = "abstract", default, deserialize_with = "null_as_default")]
    pub abstract_text: String,

    /// Older snapshots may lack this; it then falls back to `abstract`
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_abstract: String,

    #[serde(default = "current_year", deserialize_with = "year_or_current")]
    pub year: i32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub journal: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub published: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,

    #[serde(default = "default_citation_count", deserialize_with = "citation_count_or_floor")]
    pub citation_count: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub search_keywords: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<String>,

    #[serde(default = "default_source", deserialize_with = "source_or_unknown")]
    pub source: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

fn default_citation_count() -> u32 {
    1
}

fn default_source() -> String {
    "Unknown".to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn year_or_current<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or_else(current_year))
}

fn citation_count_or_floor<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(default_citation_count))
}

fn source_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_source))
}

impl From<&Article> for ArticleNode {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            abstract_text: article.abstract_text.clone(),
            full_abstract: article.full_abstract.clone(),
            year: article.year,
            journal: article.journal.clone(),
            doi: article.doi.clone().filter(|d| !d.is_empty()),
            published: article.published(),
            keywords: article.keywords.clone(),
            citation_count: article.citation_count,
            search_keywords: article.search_keywords.clone(),
            authors: article.authors.clone(),
            source: article.source.clone(),
            url: article.resolved_url(),
        }
    }
}

impl From<ArticleNode> for Article {
    fn from(node: ArticleNode) -> Self {
        let full_abstract = if node.full_abstract.is_empty() {
            node.abstract_text.clone()
        } else {
            node.full_abstract
        };

        Self {
            id: node.id,
            title: node.title,
            abstract_text: node.abstract_text,
            full_abstract,
            year: node.year,
            journal: node.journal,
            doi: node.doi,
            authors: node.authors,
            keywords: node.keywords,
            search_keywords: node.search_keywords,
            citation_count: node.citation_count.max(1),
            source: node.source,
            url: node.url,
            raw: None,
        }
    }
}
