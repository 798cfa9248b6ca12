//! Provider catalog
//!
//! The fixed set of catalogs polled on every update, their query contexts
//! and the per-catalog tagging rules. Task order is significant: the first
//! occurrence of an id wins during deduplication.

use litgraph_common::config::{CatalogRows, ProvidersConfig};
use serde_json::Value;
use std::fmt;

const ACS_JOURNALS: &[&str] = &[
    "Macromolecules",
    "Biomacromolecules",
    "Chemistry of Materials",
    "ACS Applied Materials & Interfaces",
    "ACS Macro Letters",
    "Journal of the American Chemical Society",
    "ACS Polymers Au",
    "Langmuir",
];

const RSC_JOURNALS: &[&str] = &[
    "Polymer Chemistry",
    "Journal of Materials Chemistry A",
    "Soft Matter",
    "Materials Horizons",
    "Green Chemistry",
];

const SPRINGER_QUERIES: &[&str] = &[
    "copolymer synthesis",
    "polymer characterization",
    "barrier properties polymer",
    "polymer blend",
    "controlled polymerization",
    "polymer nanocomposite",
];

const WILEY_JOURNALS: &[&str] = &[
    "Journal of Applied Polymer Science",
    "Journal of Polymer Science",
    "Polymer International",
    "Macromolecular Rapid Communications",
];

const SEMANTIC_SCHOLAR_QUERIES: &[&str] = &[
    "copolymer barrier properties mathematical model",
    "polymer diffusion simulation machine learning",
    "block copolymer self-assembly modeling",
    "polymer nanocomposite mechanical properties",
    "controlled radical polymerization kinetics",
];

const PUBMED_LIKE_QUERIES: &[&str] = &[
    "copolymer AND barrier AND properties",
    "block copolymer AND self-assembly",
    "polymer AND nanocomposite AND modeling",
];

/// Upstream API a catalog is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Crossref,
    SemanticScholar,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Crossref => "crossref",
            Backend::SemanticScholar => "semantic_scholar",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a task's context string is sent upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Crossref `filter=container-title:{journal}`, newest first
    Journal,
    /// Free-text search, most relevant first
    Search,
}

/// One logical provider. Each has a disjoint id namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Catalog {
    Acs,
    Rsc,
    Springer,
    Wiley,
    SemanticScholar,
    PubMedLike,
}

impl Catalog {
    /// Polling order
    pub const ALL: [Catalog; 6] = [
        Catalog::Acs,
        Catalog::Rsc,
        Catalog::Springer,
        Catalog::Wiley,
        Catalog::SemanticScholar,
        Catalog::PubMedLike,
    ];

    /// Namespace of ids minted for this catalog, without the `_` separator
    pub fn prefix(&self) -> &'static str {
        match self {
            Catalog::Acs => "acs",
            Catalog::Rsc => "rsc",
            Catalog::Springer => "springer",
            Catalog::Wiley => "wiley",
            Catalog::SemanticScholar => "semantic_adv",
            Catalog::PubMedLike => "pubmed_like",
        }
    }

    /// Display name stored as the article `source`
    pub fn source_name(&self) -> &'static str {
        match self {
            Catalog::Acs => "ACS Publications",
            Catalog::Rsc => "RSC Publications",
            Catalog::Springer => "Springer",
            Catalog::Wiley => "Wiley",
            Catalog::SemanticScholar => "Semantic Scholar",
            Catalog::PubMedLike => "PubMed-like",
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Catalog::SemanticScholar => Backend::SemanticScholar,
            _ => Backend::Crossref,
        }
    }

    pub fn mode(&self) -> QueryMode {
        match self {
            Catalog::Acs | Catalog::Rsc | Catalog::Wiley => QueryMode::Journal,
            Catalog::Springer | Catalog::SemanticScholar | Catalog::PubMedLike => {
                QueryMode::Search
            }
        }
    }

    /// Journal names or search queries polled for this catalog
    pub fn contexts(&self) -> &'static [&'static str] {
        match self {
            Catalog::Acs => ACS_JOURNALS,
            Catalog::Rsc => RSC_JOURNALS,
            Catalog::Springer => SPRINGER_QUERIES,
            Catalog::Wiley => WILEY_JOURNALS,
            Catalog::SemanticScholar => SEMANTIC_SCHOLAR_QUERIES,
            Catalog::PubMedLike => PUBMED_LIKE_QUERIES,
        }
    }

    pub fn rows(&self, rows: &CatalogRows) -> u32 {
        match self {
            Catalog::Acs => rows.acs,
            Catalog::Rsc => rows.rsc,
            Catalog::Springer => rows.springer,
            Catalog::Wiley => rows.wiley,
            Catalog::SemanticScholar => rows.semantic_scholar,
            Catalog::PubMedLike => rows.pubmed_like,
        }
    }

    /// Topical tags for an item fetched with `context`
    pub fn keywords(&self, context: &str) -> Vec<String> {
        let tags: Vec<&str> = match self {
            Catalog::Acs => vec!["ACS", "chemistry", "polymer", "material science"],
            Catalog::Rsc => vec!["RSC", "chemistry", "polymer", "material science"],
            Catalog::Springer => vec![context, "polymer", "chemistry"],
            Catalog::Wiley => vec!["Wiley", "polymer", "applied science"],
            Catalog::SemanticScholar => vec![context],
            Catalog::PubMedLike => context.split(" AND ").collect(),
        };
        tags.into_iter().map(String::from).collect()
    }

    /// Journal used when a search hit carries no container title
    pub fn journal_fallback(&self) -> &'static str {
        match self {
            Catalog::Springer => "Springer Journal",
            Catalog::PubMedLike => "PubMed-like Journal",
            _ => "Unknown",
        }
    }

    /// Only PubMed-like items get a placeholder author when none are listed
    pub fn requires_author(&self) -> bool {
        matches!(self, Catalog::PubMedLike)
    }

    /// Whether a raw hit belongs to this catalog. Springer searches the
    /// whole Crossref index and keeps only Springer-published items.
    pub fn accepts(&self, raw: &Value) -> bool {
        match self {
            Catalog::Springer => raw
                .get("publisher")
                .and_then(Value::as_str)
                .is_some_and(|p| p.to_lowercase().contains("springer")),
            _ => true,
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_name())
    }
}

/// One unit of polling work: a catalog plus the journal or query to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTask {
    pub catalog: Catalog,
    pub context: String,
    pub rows: u32,
}

impl QueryTask {
    pub fn new(catalog: Catalog, context: impl Into<String>, rows: u32) -> Self {
        Self {
            catalog,
            context: context.into(),
            rows,
        }
    }

    pub fn mode(&self) -> QueryMode {
        self.catalog.mode()
    }
}

impl fmt::Display for QueryTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.catalog, self.context)
    }
}

/// The full ordered task queue for one update cycle
pub fn default_tasks(config: &ProvidersConfig) -> Vec<QueryTask> {
    Catalog::ALL
        .iter()
        .flat_map(|catalog| {
            let rows = catalog.rows(&config.rows);
            catalog
                .contexts()
                .iter()
                .map(move |context| QueryTask::new(*catalog, *context, rows))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_task_queue() {
        let tasks = default_tasks(&ProvidersConfig::default());

        assert_eq!(tasks.len(), 8 + 5 + 6 + 4 + 5 + 3);
        assert_eq!(tasks[0], QueryTask::new(Catalog::Acs, "Macromolecules", 15));
        assert_eq!(tasks[8].catalog, Catalog::Rsc);
        assert_eq!(tasks[8].rows, 12);

        let last = tasks.last().unwrap();
        assert_eq!(last.catalog, Catalog::PubMedLike);
        assert_eq!(last.rows, 8);
    }

    #[test]
    fn test_prefixes_are_disjoint() {
        for a in Catalog::ALL {
            for b in Catalog::ALL {
                if a != b {
                    let (pa, pb) = (format!("{}_", a.prefix()), format!("{}_", b.prefix()));
                    assert!(!pa.starts_with(&pb), "{} shadows {}", pb, pa);
                }
            }
        }
    }

    #[test]
    fn test_keywords_per_catalog() {
        assert_eq!(
            Catalog::Springer.keywords("polymer blend"),
            vec!["polymer blend", "polymer", "chemistry"]
        );
        assert_eq!(
            Catalog::PubMedLike.keywords("block copolymer AND self-assembly"),
            vec!["block copolymer", "self-assembly"]
        );
        assert_eq!(Catalog::Wiley.keywords("Polymer International")[0], "Wiley");
    }

    #[test]
    fn test_springer_publisher_filter() {
        assert!(Catalog::Springer.accepts(&json!({"publisher": "Springer Science and Business Media LLC"})));
        assert!(!Catalog::Springer.accepts(&json!({"publisher": "Elsevier BV"})));
        assert!(!Catalog::Springer.accepts(&json!({})));
        assert!(Catalog::Acs.accepts(&json!({})));
    }

    #[test]
    fn test_backends_and_modes() {
        assert_eq!(Catalog::SemanticScholar.backend(), Backend::SemanticScholar);
        assert_eq!(Catalog::PubMedLike.backend(), Backend::Crossref);
        assert_eq!(Catalog::Wiley.mode(), QueryMode::Journal);
        assert_eq!(Catalog::Springer.mode(), QueryMode::Search);
    }
}
