//! Host documents the pipeline can extract from
//!
//! A host document owns the source tree. Before its root can be read the
//! document must finish a one-time readiness wait ([`HostDocument::load_all`]).
//!
//! - SnapshotDocument: a JSON design-document export read from disk
//! - PageDocument: a live web page driven over the Chrome DevTools Protocol

pub mod config;
pub mod page;
pub mod snapshot;

pub use config::{ConnectionOptions, LaunchOptions};
pub use page::PageDocument;
pub use snapshot::{DocumentNode, SnapshotDocument};

use crate::{error::Result, traversal::SourceNode};
use async_trait::async_trait;

/// A document owning a tree of source nodes
#[async_trait]
pub trait HostDocument: Send {
    /// Node type of this host
    type Node: SourceNode + Sync;

    /// Wait until the full node set is resident
    async fn load_all(&mut self) -> Result<()>;

    /// Root of the loaded tree
    fn root(&self) -> Result<&Self::Node>;

    /// Short human-readable origin of the document, used in logs
    fn describe(&self) -> String;
}
