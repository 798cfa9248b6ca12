//! Pairwise relationship inference
//!
//! Every unordered pair of articles is compared once. A pair yields an
//! `authors` edge when the articles share authors and a `keywords` edge when
//! they share keywords, so between zero and two edges per pair.

use std::collections::BTreeSet;
use std::time::Instant;

use litgraph_common::metrics::record_graph;
use litgraph_common::{Article, ArticleNode, Evidence, GraphSnapshot, Relationship};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Weight of one shared author
const AUTHOR_WEIGHT: u32 = 2;

/// Weight of one shared keyword
const KEYWORD_WEIGHT: u32 = 1;

/// Summary of one graph build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub links: usize,
    pub author_links: usize,
    pub keyword_links: usize,
}

impl GraphStats {
    pub fn of(snapshot: &GraphSnapshot) -> Self {
        let author_links = snapshot
            .links
            .iter()
            .filter(|l| matches!(l.evidence, Evidence::Authors { .. }))
            .count();

        Self {
            nodes: snapshot.nodes.len(),
            links: snapshot.links.len(),
            author_links,
            keyword_links: snapshot.links.len() - author_links,
        }
    }
}

/// Lowercased comparison sets for one article
struct Profile<'a> {
    id: &'a str,
    authors: BTreeSet<String>,
    keywords: BTreeSet<String>,
}

impl<'a> Profile<'a> {
    fn of(article: &'a Article) -> Self {
        Self {
            id: &article.id,
            authors: normalized_set(article.authors.iter()),
            keywords: normalized_set(article.keywords.iter().chain(&article.search_keywords)),
        }
    }
}

fn normalized_set<'s>(values: impl Iterator<Item = &'s String>) -> BTreeSet<String> {
    values
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

fn common(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    a.intersection(b).cloned().collect()
}

/// Builds the full relationship graph over an article list.
///
/// The build is a full recompute: quadratic in the number of articles and
/// free of I/O.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Compute all edges between `articles`.
    ///
    /// Pairs are enumerated as `i < j`, so `source` always precedes `target`
    /// in input order. Pairs with equal ids are skipped.
    pub fn relationships(&self, articles: &[Article]) -> Vec<Relationship> {
        let profiles: Vec<Profile<'_>> = articles.iter().map(Profile::of).collect();
        let mut links = Vec::new();
        let mut duplicate_pairs = 0usize;

        for (i, a) in profiles.iter().enumerate() {
            for b in &profiles[i + 1..] {
                if a.id == b.id {
                    duplicate_pairs += 1;
                    continue;
                }

                let shared_authors = common(&a.authors, &b.authors);
                if !shared_authors.is_empty() {
                    links.push(Relationship {
                        source: a.id.to_string(),
                        target: b.id.to_string(),
                        strength: AUTHOR_WEIGHT * shared_authors.len() as u32,
                        evidence: Evidence::Authors {
                            common_authors: shared_authors,
                        },
                    });
                }

                let shared_keywords = common(&a.keywords, &b.keywords);
                if !shared_keywords.is_empty() {
                    links.push(Relationship {
                        source: a.id.to_string(),
                        target: b.id.to_string(),
                        strength: KEYWORD_WEIGHT * shared_keywords.len() as u32,
                        evidence: Evidence::Keywords {
                            common_keywords: shared_keywords,
                        },
                    });
                }
            }
        }

        if duplicate_pairs > 0 {
            warn!(duplicate_pairs, "Article list contains repeated ids; skipped self pairs");
        }

        links
    }

    /// Build the snapshot for `articles`: one node per article (URLs
    /// resolved) plus every inferred edge.
    #[instrument(skip(self, articles), fields(articles = articles.len()))]
    pub fn build(&self, articles: &[Article]) -> (GraphSnapshot, GraphStats) {
        let started = Instant::now();

        let nodes: Vec<ArticleNode> = articles.iter().map(ArticleNode::from).collect();
        let links = self.relationships(articles);
        let snapshot = GraphSnapshot::new(nodes, links);
        let stats = GraphStats::of(&snapshot);

        let elapsed = started.elapsed().as_secs_f64();
        record_graph(elapsed, stats.nodes, stats.links);

        debug!(
            author_links = stats.author_links,
            keyword_links = stats.keyword_links,
            "Relationship breakdown"
        );
        info!(
            nodes = stats.nodes,
            links = stats.links,
            duration_ms = (elapsed * 1000.0) as u64,
            "Graph built"
        );

        (snapshot, stats)
    }
}
