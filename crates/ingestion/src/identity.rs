//! Article identity
//!
//! Ids are `{prefix}_{key}` where the key is the DOI (or a provider-native
//! id) when one exists, else a digest of the normalized title. The same
//! item always yields the same id, across runs and processes.

use sha2::{Digest, Sha256};

use crate::catalog::Catalog;

/// Hex characters kept from the title digest
const TITLE_HASH_LEN: usize = 16;

/// Trim, lowercase and collapse internal whitespace
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Truncated SHA-256 of the normalized title
pub fn title_hash(title: &str) -> String {
    let digest = Sha256::digest(normalize_title(title).as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(TITLE_HASH_LEN);
    hex
}

/// Mint the canonical id for an item of `catalog`
pub fn article_id(catalog: Catalog, native_id: Option<&str>, title: &str) -> String {
    match native_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("{}_{}", catalog.prefix(), id),
        None => format!("{}_{}", catalog.prefix(), title_hash(title)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doi_id() {
        assert_eq!(
            article_id(Catalog::Acs, Some("10.1021/acs.macromol.4c00001"), "T"),
            "acs_10.1021/acs.macromol.4c00001"
        );
    }

    #[test]
    fn test_hash_is_deterministic_and_normalized() {
        let a = title_hash("  Block  Copolymer\tSelf-Assembly ");
        let b = title_hash("block copolymer self-assembly");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, title_hash("block copolymer"));
    }

    #[test]
    fn test_blank_native_id_falls_back_to_hash() {
        let id = article_id(Catalog::PubMedLike, Some("  "), "Polymer nanocomposites");
        assert_eq!(id, format!("pubmed_like_{}", title_hash("Polymer nanocomposites")));
    }

    #[test]
    fn test_same_key_in_different_namespaces() {
        let acs = article_id(Catalog::Acs, Some("10.1/x"), "T");
        let rsc = article_id(Catalog::Rsc, Some("10.1/x"), "T");
        assert_ne!(acs, rsc);
    }
}
