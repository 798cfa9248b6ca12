//! Relationship edges and the persisted graph snapshot

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::article::ArticleNode;

/// Kind of relationship between two articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    /// The articles share at least one author
    Authors,
    /// The articles share at least one keyword or search keyword
    Keywords,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Authors => "authors",
            RelationType::Keywords => "keywords",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence supporting an edge; the variant tag is serialized as `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Evidence {
    Authors { common_authors: BTreeSet<String> },
    Keywords { common_keywords: BTreeSet<String> },
}

impl Evidence {
    pub fn relation_type(&self) -> RelationType {
        match self {
            Evidence::Authors { .. } => RelationType::Authors,
            Evidence::Keywords { .. } => RelationType::Keywords,
        }
    }

    /// The shared names or keywords
    pub fn items(&self) -> &BTreeSet<String> {
        match self {
            Evidence::Authors { common_authors } => common_authors,
            Evidence::Keywords { common_keywords } => common_keywords,
        }
    }
}

/// Weighted, undirected edge between two articles.
///
/// `source`/`target` follow enumeration order and carry no direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub strength: u32,
    #[serde(flatten)]
    pub evidence: Evidence,
}

impl Relationship {
    pub fn relation_type(&self) -> RelationType {
        self.evidence.relation_type()
    }

    /// Whether this edge connects the given ids, in either order
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// The `{nodes, links}` document persisted by the store and served to clients
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<ArticleNode>,
    #[serde(default)]
    pub links: Vec<Relationship>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<ArticleNode>, links: Vec<Relationship>) -> Self {
        Self { nodes, links }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of all nodes in the snapshot
    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Keep only nodes matching `keep`, then drop links whose endpoints
    /// are no longer both present.
    pub fn retain_nodes<F>(&mut self, keep: F)
    where
        F: FnMut(&ArticleNode) -> bool,
    {
        self.nodes.retain(keep);

        let ids: HashSet<String> = self.nodes.iter().map(|n| n.id.clone()).collect();
        self.links
            .retain(|link| ids.contains(&link.source) && ids.contains(&link.target));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article::tests::article;

    fn keywords_edge(source: &str, target: &str, words: &[&str]) -> Relationship {
        Relationship {
            source: source.into(),
            target: target.into(),
            strength: words.len() as u32,
            evidence: Evidence::Keywords {
                common_keywords: words.iter().map(|w| w.to_string()).collect(),
            },
        }
    }

    #[test]
    fn test_relationship_wire_format() {
        let edge = Relationship {
            source: "a".into(),
            target: "b".into(),
            strength: 2,
            evidence: Evidence::Authors {
                common_authors: ["j. smith".to_string()].into_iter().collect(),
            },
        };

        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(value["type"], "authors");
        assert_eq!(value["strength"], 2);
        assert_eq!(value["common_authors"][0], "j. smith");

        let parsed: Relationship = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, edge);
        assert_eq!(parsed.relation_type(), RelationType::Authors);
    }

    #[test]
    fn test_connects_is_unordered() {
        let edge = keywords_edge("a", "b", &["polymer"]);
        assert!(edge.connects("a", "b"));
        assert!(edge.connects("b", "a"));
        assert!(!edge.connects("a", "c"));
    }

    #[test]
    fn test_retain_nodes_prunes_dangling_links() {
        let nodes = ["a", "b", "c"]
            .iter()
            .map(|id| ArticleNode::from(&article(id, "T")))
            .collect();
        let links = vec![
            keywords_edge("a", "b", &["polymer"]),
            keywords_edge("b", "c", &["copolymer"]),
        ];
        let mut snapshot = GraphSnapshot::new(nodes, links);

        snapshot.retain_nodes(|n| n.id != "c");

        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.links.len(), 1);
        assert!(snapshot.links[0].connects("a", "b"));
    }

    #[test]
    fn test_missing_keys_deserialize_empty() {
        let snapshot: GraphSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.links.is_empty());
    }
}
