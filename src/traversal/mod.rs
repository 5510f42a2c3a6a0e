//! Depth-first traversal of host document trees
//!
//! This module defines what the pipeline needs to know about a host node and
//! how it walks a tree of them:
//! - SourceNode: id, name, type and child capability of a host node
//! - NodeKind: whether a node is a leaf or a container
//! - Walker: explicit-stack depth-first iterator of enter/exit visits

pub mod source;
pub mod walker;

pub use source::{NodeKind, SourceNode};
pub use walker::{Visit, Walker};
