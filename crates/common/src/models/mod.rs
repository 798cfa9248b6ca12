//! Domain models
//!
//! - [`Article`]: canonical, provider-agnostic record produced by normalization
//! - [`ArticleNode`]: the persisted/served view of an article
//! - [`Relationship`]: weighted edge between two articles
//! - [`GraphSnapshot`]: `{nodes, links}` document, the only persisted artifact

mod article;
mod graph;

pub use article::{Article, ArticleNode, NO_ABSTRACT, NO_TITLE, UNSPECIFIED_AUTHORS};
pub use graph::{Evidence, GraphSnapshot, Relationship, RelationType};
