use crate::mirror::node::MirrorNode;

/// Summary counters for a mirror tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    /// Total number of mirror nodes
    pub nodes: usize,
    /// Nodes without a `children` field
    pub leaves: usize,
    /// Nodes with at least one child
    pub containers: usize,
    /// Depth of the deepest node, the root being 0
    pub max_depth: usize,
}

impl MirrorStats {
    pub fn of(root: &MirrorNode) -> Self {
        root.iter().fold(Self::default(), |mut stats, (node, depth)| {
            stats.nodes += 1;
            if node.has_children() {
                stats.containers += 1;
            } else {
                stats.leaves += 1;
            }
            stats.max_depth = stats.max_depth.max(depth);
            stats
        })
    }
}
