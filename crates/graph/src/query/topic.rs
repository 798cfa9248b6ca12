//! Topic groups
//!
//! A topic is a fixed group of terms. An article belongs to a topic when any
//! term occurs as a substring of its lowercased match text.

use litgraph_common::ArticleNode;
use std::fmt;

const COPOLYMER_TERMS: &[&str] = &["copolymer", "polymer", "blend", "macromolecule"];
const BARRIER_TERMS: &[&str] = &["barrier", "permeability", "gas", "diffusion"];
const MODEL_TERMS: &[&str] = &["model", "learning", "neural", "simulation", "mathematical"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topic {
    /// No filtering
    #[default]
    All,
    Copolymer,
    Barrier,
    Model,
}

impl Topic {
    /// Parse a query parameter. Unknown names select [`Topic::All`].
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "copolymer" => Topic::Copolymer,
            "barrier" => Topic::Barrier,
            "model" => Topic::Model,
            _ => Topic::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::All => "all",
            Topic::Copolymer => "copolymer",
            Topic::Barrier => "barrier",
            Topic::Model => "model",
        }
    }

    /// Terms of this group; empty for [`Topic::All`]
    pub fn terms(&self) -> &'static [&'static str] {
        match self {
            Topic::All => &[],
            Topic::Copolymer => COPOLYMER_TERMS,
            Topic::Barrier => BARRIER_TERMS,
            Topic::Model => MODEL_TERMS,
        }
    }

    pub fn matches(&self, node: &ArticleNode) -> bool {
        if *self == Topic::All {
            return true;
        }

        let text = match_text(node);
        self.terms().iter().any(|term| text.contains(term))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search keywords, keywords, title and abstract joined and lowercased
fn match_text(node: &ArticleNode) -> String {
    node.search_keywords
        .iter()
        .chain(&node.keywords)
        .map(String::as_str)
        .chain([node.title.as_str(), node.abstract_text.as_str()])
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(title: &str, keywords: &[&str]) -> ArticleNode {
        serde_json::from_value(serde_json::json!({
            "id": "acs_1",
            "title": title,
            "abstract": "No abstract available",
            "year": 2024,
            "keywords": keywords,
        }))
        .unwrap()
    }

    #[test]
    fn test_from_param() {
        assert_eq!(Topic::from_param("copolymer"), Topic::Copolymer);
        assert_eq!(Topic::from_param("Barrier"), Topic::Barrier);
        assert_eq!(Topic::from_param("model"), Topic::Model);
        assert_eq!(Topic::from_param("all"), Topic::All);
        assert_eq!(Topic::from_param("astronomy"), Topic::All);
    }

    #[test]
    fn test_substring_match() {
        // "polymer" is a substring of "Polymers"
        let n = node("Polymers for packaging", &[]);
        assert!(Topic::Copolymer.matches(&n));
        assert!(!Topic::Barrier.matches(&n));

        let n = node("Untitled", &["Gas transport"]);
        assert!(Topic::Barrier.matches(&n));
    }

    #[test]
    fn test_search_keywords_and_abstract_count() {
        let mut n = node("Untitled", &[]);
        n.search_keywords = vec!["polymer diffusion simulation machine learning".into()];
        assert!(Topic::Model.matches(&n));

        let mut n = node("Untitled", &[]);
        n.abstract_text = "A neural surrogate".into();
        assert!(Topic::Model.matches(&n));
    }

    #[test]
    fn test_all_matches_everything() {
        assert!(Topic::All.matches(&node("", &[])));
    }
}
