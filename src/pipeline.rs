//! Extraction runs: readiness wait, mirror build, one delivery

use crate::{
    delivery::{DeliveryClient, DeliveryHandle, DeliveryReport},
    error::Result,
    host::HostDocument,
    mirror::{self, MirrorNode, MirrorStats},
};
use log::info;

/// Wires a host document to the delivery client
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: DeliveryClient,
}

/// Result of one extraction run
#[derive(Debug)]
pub struct Extraction {
    /// The mirror that was serialized and dispatched
    pub mirror: MirrorNode,

    pub stats: MirrorStats,

    delivery: DeliveryHandle,
}

impl Extraction {
    /// Wait for the delivery outcome within the client's grace period
    ///
    /// Consumes the run; the mirror is discarded afterwards.
    pub async fn settle(self) -> DeliveryReport {
        self.delivery.settle().await
    }
}

impl Pipeline {
    pub fn new(client: DeliveryClient) -> Self {
        Self { client }
    }

    /// Extract the host's tree and dispatch it to the collector
    ///
    /// The readiness wait is the only suspension point before the walk.
    /// Host, traversal and serialization errors are returned; the delivery
    /// outcome is only available through [`Extraction::settle`].
    pub async fn run<H: HostDocument>(&self, host: &mut H) -> Result<Extraction> {
        info!("Waiting for {} to load", host.describe());
        host.load_all().await?;

        let mirror = mirror::build(host.root()?)?;
        let stats = MirrorStats::of(&mirror);
        let body = mirror.to_json()?;
        info!(
            "Extracted {} nodes ({} containers, depth {}) from {}",
            stats.nodes,
            stats.containers,
            stats.max_depth,
            host.describe()
        );

        info!("Dispatching mirror to {}", self.client.endpoint());
        let delivery = self.client.dispatch(body);
        Ok(Extraction { mirror, stats, delivery })
    }
}
