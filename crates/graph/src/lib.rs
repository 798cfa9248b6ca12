//! LitGraph relationship graph
//!
//! Pure, synchronous computations over the article corpus:
//! - Relationship inference (co-authorship and shared-keyword edges)
//! - Topic and year-range queries over a stored snapshot

pub mod query;
pub mod relationship;

pub use query::{parse_date, ArticleQuery, Topic, YearRange, DATE_FORMAT};
pub use relationship::{GraphBuilder, GraphStats};
