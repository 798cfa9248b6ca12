//! Record normalization
//!
//! Converts one raw provider item into a canonical [`Article`]. Each backend
//! has its own wire schema; the catalog decides tagging, journal fallback and
//! the author placeholder rule.

use chrono::Datelike;
use litgraph_common::{Article, NO_ABSTRACT, NO_TITLE, UNSPECIFIED_AUTHORS};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::catalog::{Backend, QueryMode, QueryTask};
use crate::errors::NormalizeError;
use crate::identity::article_id;

/// Characters of abstract kept for display
pub const ABSTRACT_DISPLAY_CHARS: usize = 500;

/// Crossref `works` item (only the fields we read)
#[derive(Debug, Deserialize)]
struct CrossrefItem {
    #[serde(default)]
    title: Option<Vec<String>>,

    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,

    #[serde(default)]
    created: Option<CrossrefDate>,

    #[serde(default, rename = "DOI")]
    doi: Option<String>,

    #[serde(default)]
    author: Option<Vec<CrossrefAuthor>>,

    #[serde(default, rename = "container-title")]
    container_title: Option<Vec<String>>,

    #[serde(default, rename = "is-referenced-by-count")]
    referenced_by: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CrossrefDate {
    #[serde(default, rename = "date-parts")]
    date_parts: Vec<Vec<Option<i64>>>,
}

#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
    #[serde(default)]
    given: Option<String>,
    #[serde(default)]
    family: Option<String>,
}

/// Semantic Scholar paper search hit
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SemanticScholarPaper {
    #[serde(default)]
    paper_id: Option<String>,

    #[serde(default)]
    title: Option<String>,

    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,

    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    year: Option<i32>,

    #[serde(default)]
    venue: Option<String>,

    #[serde(default)]
    external_ids: Option<HashMap<String, Value>>,

    #[serde(default)]
    citation_count: Option<i64>,

    #[serde(default)]
    authors: Option<Vec<SemanticScholarAuthor>>,
}

#[derive(Debug, Deserialize)]
struct SemanticScholarAuthor {
    #[serde(default)]
    name: Option<String>,
}

/// Split an abstract into its display and full forms
pub fn display_abstract(full: &str) -> String {
    if full.chars().count() > ABSTRACT_DISPLAY_CHARS {
        let mut shown: String = full.chars().take(ABSTRACT_DISPLAY_CHARS).collect();
        shown.push_str("...");
        shown
    } else {
        full.to_string()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn citation_floor(count: Option<i64>) -> u32 {
    count.unwrap_or(1).clamp(1, u32::MAX as i64) as u32
}

fn crossref_author(author: &CrossrefAuthor) -> Option<String> {
    let given = author.given.as_deref().unwrap_or("").trim();
    let family = author.family.as_deref().unwrap_or("").trim();

    match (given.is_empty(), family.is_empty()) {
        (true, true) => None,
        (false, true) => Some(given.to_string()),
        (true, false) => Some(family.to_string()),
        (false, false) => Some(format!("{} {}", given, family)),
    }
}

/// Converts raw provider items into articles
#[derive(Debug, Clone)]
pub struct Normalizer {
    current_year: i32,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            current_year: chrono::Utc::now().year(),
        }
    }

    /// Normalizer with a fixed fallback year
    pub fn with_year(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Normalize one raw item fetched by `task`
    pub fn normalize(&self, task: &QueryTask, raw: Value) -> Result<Article, NormalizeError> {
        match task.catalog.backend() {
            Backend::Crossref => self.from_crossref(task, raw),
            Backend::SemanticScholar => self.from_semantic_scholar(task, raw),
        }
    }

    fn from_crossref(&self, task: &QueryTask, raw: Value) -> Result<Article, NormalizeError> {
        let catalog = task.catalog;
        let item: CrossrefItem =
            serde_json::from_value(raw.clone()).map_err(|e| NormalizeError::Malformed {
                provider: catalog.backend().as_str(),
                message: e.to_string(),
            })?;

        let title = match item.title {
            None => NO_TITLE.to_string(),
            Some(titles) => titles
                .into_iter()
                .next()
                .and_then(|t| non_blank(Some(t)))
                .ok_or(NormalizeError::EmptyTitle)?,
        };

        let full_abstract = non_blank(item.abstract_text).unwrap_or_else(|| NO_ABSTRACT.to_string());

        let year = item
            .created
            .and_then(|c| c.date_parts.into_iter().next())
            .and_then(|parts| parts.into_iter().next().flatten())
            .filter(|y| *y > 0)
            .map(|y| y as i32)
            .unwrap_or(self.current_year);

        let doi = non_blank(item.doi);

        let mut authors: Vec<String> = item
            .author
            .unwrap_or_default()
            .iter()
            .filter_map(crossref_author)
            .collect();
        if authors.is_empty() && catalog.requires_author() {
            authors.push(UNSPECIFIED_AUTHORS.to_string());
        }

        let journal = match task.mode() {
            QueryMode::Journal => task.context.clone(),
            QueryMode::Search => item
                .container_title
                .and_then(|titles| titles.into_iter().find_map(|t| non_blank(Some(t))))
                .unwrap_or_else(|| catalog.journal_fallback().to_string()),
        };

        let mut article = Article {
            id: article_id(catalog, doi.as_deref(), &title),
            abstract_text: display_abstract(&full_abstract),
            full_abstract,
            title,
            year,
            journal,
            doi,
            authors,
            keywords: catalog.keywords(&task.context),
            search_keywords: vec![task.context.clone()],
            citation_count: citation_floor(item.referenced_by),
            source: catalog.source_name().to_string(),
            url: String::new(),
            raw: Some(raw),
        };
        article.resolve_url();

        Ok(article)
    }

    fn from_semantic_scholar(&self, task: &QueryTask, raw: Value) -> Result<Article, NormalizeError> {
        let catalog = task.catalog;
        let paper: SemanticScholarPaper =
            serde_json::from_value(raw.clone()).map_err(|e| NormalizeError::Malformed {
                provider: catalog.backend().as_str(),
                message: e.to_string(),
            })?;

        let title = match paper.title {
            None => NO_TITLE.to_string(),
            Some(t) => non_blank(Some(t)).ok_or(NormalizeError::EmptyTitle)?,
        };

        let full_abstract = non_blank(paper.abstract_text).unwrap_or_else(|| NO_ABSTRACT.to_string());

        let doi = paper
            .external_ids
            .as_ref()
            .and_then(|ids| ids.get("DOI"))
            .and_then(Value::as_str)
            .map(String::from)
            .and_then(|d| non_blank(Some(d)));

        let authors = paper
            .authors
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| non_blank(a.name))
            .collect();

        let paper_id = non_blank(paper.paper_id);
        let url = non_blank(paper.url)
            .or_else(|| {
                paper_id
                    .as_ref()
                    .map(|id| format!("https://www.semanticscholar.org/paper/{}", id))
            })
            .unwrap_or_default();

        let mut article = Article {
            id: article_id(catalog, paper_id.as_deref(), &title),
            abstract_text: display_abstract(&full_abstract),
            full_abstract,
            title,
            year: paper.year.filter(|y| *y > 0).unwrap_or(self.current_year),
            journal: non_blank(paper.venue).unwrap_or_else(|| catalog.journal_fallback().to_string()),
            doi,
            authors,
            keywords: catalog.keywords(&task.context),
            search_keywords: vec![task.context.clone()],
            citation_count: citation_floor(paper.citation_count),
            source: catalog.source_name().to_string(),
            url,
            raw: Some(raw),
        };
        article.resolve_url();

        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::identity::title_hash;
    use serde_json::json;

    fn normalizer() -> Normalizer {
        Normalizer::with_year(2025)
    }

    fn acs_task() -> QueryTask {
        QueryTask::new(Catalog::Acs, "Macromolecules", 15)
    }

    #[test]
    fn test_crossref_journal_item() {
        let raw = json!({
            "title": ["Sequence-controlled copolymers"],
            "abstract": "<jats:p>Short abstract</jats:p>",
            "created": {"date-parts": [[2024, 3, 1]]},
            "DOI": "10.1021/acs.macromol.4c00001",
            "author": [
                {"given": " Ana ", "family": "Ruiz"},
                {"given": "", "family": ""},
                {"family": "Chen"}
            ],
            "is-referenced-by-count": 7
        });

        let a = normalizer().normalize(&acs_task(), raw).unwrap();

        assert_eq!(a.id, "acs_10.1021/acs.macromol.4c00001");
        assert_eq!(a.title, "Sequence-controlled copolymers");
        assert_eq!(a.year, 2024);
        assert_eq!(a.journal, "Macromolecules");
        assert_eq!(a.authors, vec!["Ana Ruiz", "Chen"]);
        assert_eq!(a.keywords, vec!["ACS", "chemistry", "polymer", "material science"]);
        assert_eq!(a.search_keywords, vec!["Macromolecules"]);
        assert_eq!(a.citation_count, 7);
        assert_eq!(a.source, "ACS Publications");
        assert_eq!(a.url, "https://doi.org/10.1021/acs.macromol.4c00001");
        assert!(a.raw.is_some());
    }

    #[test]
    fn test_crossref_defaults() {
        let raw = json!({"created": {"date-parts": [[null]]}, "is-referenced-by-count": 0});

        let a = normalizer().normalize(&acs_task(), raw).unwrap();

        assert_eq!(a.title, NO_TITLE);
        assert_eq!(a.full_abstract, NO_ABSTRACT);
        assert_eq!(a.year, 2025);
        assert_eq!(a.citation_count, 1);
        assert!(a.authors.is_empty());
        assert_eq!(a.id, format!("acs_{}", title_hash(NO_TITLE)));
        assert!(a.url.starts_with("https://scholar.google.com/scholar?q="));
    }

    #[test]
    fn test_empty_title_list_is_rejected() {
        let err = normalizer()
            .normalize(&acs_task(), json!({"title": []}))
            .unwrap_err();
        assert_eq!(err, NormalizeError::EmptyTitle);
    }

    #[test]
    fn test_malformed_item_is_rejected() {
        let err = normalizer()
            .normalize(&acs_task(), json!({"title": "not a list"}))
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed { provider: "crossref", .. }));
    }

    #[test]
    fn test_abstract_truncation() {
        let long = "é".repeat(600);
        let raw = json!({"title": ["T"], "abstract": long});

        let a = normalizer().normalize(&acs_task(), raw).unwrap();

        assert_eq!(a.full_abstract.chars().count(), 600);
        assert_eq!(a.abstract_text.chars().count(), 503);
        assert!(a.abstract_text.ends_with("..."));

        assert_eq!(display_abstract(&"x".repeat(500)), "x".repeat(500));
    }

    #[test]
    fn test_pubmed_like_placeholder_author_and_journal() {
        let task = QueryTask::new(Catalog::PubMedLike, "copolymer AND barrier AND properties", 8);
        let raw = json!({"title": ["Barrier copolymers"], "author": []});

        let a = normalizer().normalize(&task, raw).unwrap();

        assert_eq!(a.authors, vec![UNSPECIFIED_AUTHORS]);
        assert_eq!(a.journal, "PubMed-like Journal");
        assert_eq!(a.keywords, vec!["copolymer", "barrier", "properties"]);
        assert!(a.id.starts_with("pubmed_like_"));
    }

    #[test]
    fn test_springer_journal_from_container_title() {
        let task = QueryTask::new(Catalog::Springer, "polymer blend", 10);
        let raw = json!({
            "title": ["Blend morphology"],
            "container-title": ["Colloid and Polymer Science"],
            "publisher": "Springer Science and Business Media LLC"
        });

        let a = normalizer().normalize(&task, raw).unwrap();
        assert_eq!(a.journal, "Colloid and Polymer Science");
        assert!(a.authors.is_empty());

        let a = normalizer()
            .normalize(&task, json!({"title": ["X"], "container-title": []}))
            .unwrap();
        assert_eq!(a.journal, "Springer Journal");
    }

    #[test]
    fn test_semantic_scholar_paper() {
        let task = QueryTask::new(
            Catalog::SemanticScholar,
            "polymer diffusion simulation machine learning",
            8,
        );
        let raw = json!({
            "paperId": "649def34f8be52c8b66281af98ae884c09aef38b",
            "title": "Learning diffusion in polymers",
            "abstract": null,
            "url": null,
            "year": 2023,
            "venue": "",
            "externalIds": {"DOI": "10.1000/xyz", "CorpusId": 12345},
            "citationCount": 0,
            "authors": [{"authorId": "1", "name": "K. Tanaka"}, {"name": null}]
        });

        let a = normalizer().normalize(&task, raw).unwrap();

        assert_eq!(a.id, "semantic_adv_649def34f8be52c8b66281af98ae884c09aef38b");
        assert_eq!(a.full_abstract, NO_ABSTRACT);
        assert_eq!(a.journal, "Unknown");
        assert_eq!(a.doi.as_deref(), Some("10.1000/xyz"));
        assert_eq!(a.authors, vec!["K. Tanaka"]);
        assert_eq!(a.citation_count, 1);
        assert_eq!(a.keywords, vec!["polymer diffusion simulation machine learning"]);
        assert_eq!(
            a.url,
            "https://www.semanticscholar.org/paper/649def34f8be52c8b66281af98ae884c09aef38b"
        );
    }

    #[test]
    fn test_semantic_scholar_without_paper_id_uses_title_hash() {
        let task = QueryTask::new(Catalog::SemanticScholar, "q", 8);
        let raw = json!({"title": "Untracked paper", "url": "https://example.org/p"});

        let a = normalizer().normalize(&task, raw).unwrap();

        assert_eq!(a.id, format!("semantic_adv_{}", title_hash("Untracked paper")));
        assert_eq!(a.url, "https://example.org/p");
        assert_eq!(a.year, 2025);
    }

    #[test]
    fn test_identity_is_deterministic() {
        let raw = json!({"title": ["Same title"]});
        let a = normalizer().normalize(&acs_task(), raw.clone()).unwrap();
        let b = normalizer().normalize(&acs_task(), raw).unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_same_title_without_doi_stays_per_catalog() {
        let raw = json!({"title": ["Gradient copolymer membranes"]});
        let rsc_task = QueryTask::new(Catalog::Rsc, "Polymer Chemistry", 12);

        let acs = normalizer().normalize(&acs_task(), raw.clone()).unwrap();
        let rsc = normalizer().normalize(&rsc_task, raw).unwrap();

        let hash = title_hash("Gradient copolymer membranes");
        assert_eq!(acs.id, format!("acs_{}", hash));
        assert_eq!(rsc.id, format!("rsc_{}", hash));
        assert_ne!(acs.id, rsc.id);
    }
}
