//! # node-mirror
//!
//! Extracts a normalized mirror of a host document's node tree and delivers it
//! to a collector service.
//!
//! ## Features
//!
//! - **Host documents**: JSON design-document snapshots, or live web pages over the
//!   Chrome DevTools Protocol
//! - **Depth-safe traversal**: an explicit-stack depth-first walker, so arbitrarily deep
//!   trees never overflow the call stack
//! - **Mirror trees**: `{id, name, type, children?}` records with a canonical JSON form
//! - **Best-effort delivery**: one POST per run, failures logged and reported, shutdown
//!   bounded by a grace period
//! - **Collector**: an HTTP service receiving and storing mirrors (requires `collector` feature)
//!
//! ## Extracting a snapshot
//!
//! ```rust,no_run
//! use node_mirror::{DeliveryClient, DeliveryOptions, Pipeline, SnapshotDocument};
//!
//! # async fn run() -> node_mirror::Result<()> {
//! let client = DeliveryClient::new(DeliveryOptions::new().endpoint("http://localhost:5000/receive"))?;
//! let pipeline = Pipeline::new(client);
//!
//! let mut document = SnapshotDocument::open("design.json");
//! let extraction = pipeline.run(&mut document).await?;
//! println!("Extracted {} nodes", extraction.stats.nodes);
//!
//! // Wait for the collector, at most for the grace period
//! let report = extraction.settle().await;
//! println!("Delivery {}", report);
//! # Ok(())
//! # }
//! ```
//!
//! ## Mirroring a page
//!
//! ```rust,no_run
//! use node_mirror::{LaunchOptions, PageDocument, mirror};
//! use node_mirror::host::HostDocument;
//!
//! # async fn run() -> node_mirror::Result<()> {
//! let mut page = PageDocument::launch(LaunchOptions::new().headless(true))?
//!     .with_url("https://example.com");
//! page.load_all().await?;
//!
//! let tree = mirror::build(page.root()?)?;
//! println!("{}", tree.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`traversal`]: source node capability and the depth-first walker
//! - [`mirror`]: mirror records, post-order builder and statistics
//! - [`host`]: snapshot and page host documents
//! - [`delivery`]: the collector HTTP client
//! - [`pipeline`]: one extraction run end to end
//! - [`json`]: JSON encoding and parsing without nesting limits
//! - [`collector`]: the receiving service (requires `collector` feature)
//! - [`error`]: error types and result alias

pub mod delivery;
pub mod error;
pub mod host;
pub mod json;
pub mod mirror;
pub mod pipeline;
pub mod traversal;

#[cfg(feature = "collector")]
pub mod collector;

pub use delivery::{DeliveryClient, DeliveryHandle, DeliveryOptions, DeliveryReport};
pub use error::{MirrorError, Result};
pub use host::{ConnectionOptions, DocumentNode, HostDocument, LaunchOptions, PageDocument, SnapshotDocument};
pub use mirror::{MirrorNode, MirrorStats};
pub use pipeline::{Extraction, Pipeline};
pub use traversal::{NodeKind, SourceNode, Visit, Walker};

#[cfg(feature = "collector")]
pub use collector::{CollectorOptions, CollectorState};
