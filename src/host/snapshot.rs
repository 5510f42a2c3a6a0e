use crate::{
    error::{MirrorError, Result},
    host::HostDocument,
    json,
    traversal::{NodeKind, SourceNode},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{borrow::Cow, path::PathBuf};

/// A node of a design-document export
///
/// A node with a `children` key is a container, even when the array is
/// empty; a node without one is a leaf. Any other attributes are kept in
/// `attributes` and never reach the mirror.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentNode {
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DocumentNode>>,

    /// Host attributes not read by the pipeline (fills, layout, ...)
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl DocumentNode {
    /// Create a node whose type cannot hold children
    pub fn leaf(id: impl Into<String>, name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
            children: None,
            attributes: Map::new(),
        }
    }

    /// Create a container node with the given children
    pub fn container(
        id: impl Into<String>,
        name: impl Into<String>,
        node_type: impl Into<String>,
        children: Vec<DocumentNode>,
    ) -> Self {
        let mut node = Self::leaf(id, name, node_type);
        node.children = Some(children);
        node
    }
}

impl Drop for DocumentNode {
    fn drop(&mut self) {
        let Some(mut pending) = self.children.take() else {
            return;
        };
        while let Some(mut node) = pending.pop() {
            if let Some(children) = node.children.take() {
                pending.extend(children);
            }
        }
    }
}

impl SourceNode for DocumentNode {
    fn id(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.id)
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn node_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.node_type)
    }

    fn kind(&self) -> Result<NodeKind<'_, Self>> {
        Ok(match &self.children {
            Some(children) => NodeKind::Container(children),
            None => NodeKind::Leaf,
        })
    }
}

/// Export files that wrap the root node in `document`
#[derive(Deserialize)]
struct WrappedSnapshot {
    document: DocumentNode,
}

/// Design document loaded from a JSON export
#[derive(Debug)]
pub struct SnapshotDocument {
    path: Option<PathBuf>,
    root: Option<DocumentNode>,
}

impl SnapshotDocument {
    /// Document backed by a file, read during [`HostDocument::load_all`]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            root: None,
        }
    }

    /// Document whose tree is already resident in memory
    pub fn from_root(root: DocumentNode) -> Self {
        Self { path: None, root: Some(root) }
    }

    /// Parse a snapshot from JSON text, either the root node itself or an
    /// export wrapping it in `document`
    pub fn parse(text: &str) -> Result<DocumentNode> {
        json::from_str::<WrappedSnapshot>(text)
            .map(|file| file.document)
            .or_else(|_| json::from_str::<DocumentNode>(text))
            .map_err(|e| MirrorError::DocumentLoadFailed(format!("Invalid snapshot JSON: {}", e)))
    }
}

#[async_trait]
impl HostDocument for SnapshotDocument {
    type Node = DocumentNode;

    async fn load_all(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MirrorError::DocumentLoadFailed(format!("Failed to read {}: {}", path.display(), e)))?;
        let root = Self::parse(&json)?;
        log::debug!("Loaded snapshot {} (root {})", path.display(), root.id);
        self.root = Some(root);
        Ok(())
    }

    fn root(&self) -> Result<&DocumentNode> {
        self.root.as_ref().ok_or(MirrorError::DocumentNotReady)
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("snapshot {}", path.display()),
            None => "in-memory snapshot".to_string(),
        }
    }
}
