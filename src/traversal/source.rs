use crate::error::Result;
use std::borrow::Cow;

/// Child capability of a source node
#[derive(Debug)]
pub enum NodeKind<'a, N> {
    /// The node type cannot hold children
    Leaf,
    /// The node can hold children; the slice may be empty
    Container(&'a [N]),
}

impl<'a, N> NodeKind<'a, N> {
    /// Children of the node, empty for leaves
    pub fn children(self) -> &'a [N] {
        match self {
            NodeKind::Leaf => &[],
            NodeKind::Container(children) => children,
        }
    }
}

// Manual impls: a derive would needlessly require `N: Clone`.
impl<N> Clone for NodeKind<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for NodeKind<'_, N> {}

/// A node owned by a host document
///
/// Only the id, display name, type tag and children are read. The type tag
/// comes from an open, host-defined set.
pub trait SourceNode: Sized {
    /// Host identifier of the node
    fn id(&self) -> Cow<'_, str>;

    /// Display name of the node
    fn name(&self) -> Cow<'_, str>;

    /// Host-defined type tag (e.g. "FRAME", "TEXT", "DIV")
    fn node_type(&self) -> Cow<'_, str>;

    /// Child capability, failing when the node data cannot be read
    fn kind(&self) -> Result<NodeKind<'_, Self>>;
}
