//! Mirror trees built from host documents
//!
//! - MirrorNode: plain id/name/type record with optional children
//! - build: post-order construction of a mirror from any SourceNode tree
//! - MirrorStats: summary counters over a built mirror

pub mod builder;
pub mod node;
pub mod stats;

pub use builder::build;
pub use node::{Iter, MirrorNode};
pub use stats::MirrorStats;
