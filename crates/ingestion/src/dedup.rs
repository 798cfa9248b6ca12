//! Deduplication by article id
//!
//! Identity is exact id equality. The first occurrence of an id wins, whether
//! the repeat comes from the same query, a later query of the same catalog,
//! another catalog, or the persisted corpus. Same DOI under two catalog
//! namespaces is two different ids and is kept twice.

use litgraph_common::Article;
use std::collections::HashSet;

/// Order-preserving, first-wins id filter
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
    kept: Vec<Article>,
    duplicates: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with ids that are already known; articles carrying them are rejected
    pub fn with_known_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seen: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Keep `article` unless its id was already seen. Returns whether it was kept.
    pub fn push(&mut self, article: Article) -> bool {
        if self.seen.contains(&article.id) {
            self.duplicates += 1;
            return false;
        }
        self.seen.insert(article.id.clone());
        self.kept.push(article);
        true
    }

    pub fn extend<I: IntoIterator<Item = Article>>(&mut self, articles: I) {
        for article in articles {
            self.push(article);
        }
    }

    /// Number of rejected repeats
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Number of articles kept so far
    pub fn kept(&self) -> usize {
        self.kept.len()
    }

    pub fn into_articles(self) -> Vec<Article> {
        self.kept
    }
}

/// Articles from `candidates` whose ids are not in `existing`, first-wins
pub fn new_articles<'a, I>(existing: I, candidates: Vec<Article>) -> Vec<Article>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut dedup = Deduplicator::with_known_ids(existing);
    dedup.extend(candidates);
    dedup.into_articles()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, title: &str) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            abstract_text: String::new(),
            full_abstract: String::new(),
            year: 2024,
            journal: "Langmuir".to_string(),
            doi: None,
            authors: vec![],
            keywords: vec![],
            search_keywords: vec![],
            citation_count: 1,
            source: "ACS Publications".to_string(),
            url: String::new(),
            raw: None,
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.push(article("acs_1", "first")));
        assert!(!dedup.push(article("acs_1", "second")));
        assert!(dedup.push(article("rsc_1", "other namespace")));

        assert_eq!(dedup.duplicates(), 1);
        assert_eq!(dedup.kept(), 2);
        let kept = dedup.into_articles();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].title, "first");
    }

    #[test]
    fn test_idempotent() {
        let input = vec![article("a", "1"), article("b", "2"), article("a", "3")];

        let once = new_articles(std::iter::empty(), input);
        let twice = new_articles(std::iter::empty(), once.clone());

        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_existing_ids_are_rejected() {
        let fresh = new_articles(
            ["acs_1", "acs_2"],
            vec![article("acs_1", "old"), article("acs_3", "new")],
        );

        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id, "acs_3");
    }

    #[test]
    fn test_nothing_new() {
        let fresh = new_articles(["a", "b"], vec![article("b", "x"), article("a", "y")]);
        assert!(fresh.is_empty());
    }
}
