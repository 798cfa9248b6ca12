//! Relationship graph
//!
//! Infers co-authorship and shared-keyword edges between articles

mod builder;

pub use builder::{GraphBuilder, GraphStats};
