use crate::{
    error::{MirrorError, Result},
    json,
    traversal::SourceNode,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Normalized record of one source node
///
/// Serializes as `{"id", "name", "type", "children"?}` in that field order.
/// `children` is present only when it is non-empty, so a leaf and an empty
/// container produce the same record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorNode {
    /// Host identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Host type tag
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(
        default,
        deserialize_with = "non_empty_children",
        skip_serializing_if = "Option::is_none"
    )]
    children: Option<Vec<MirrorNode>>,
}

fn non_empty_children<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<MirrorNode>>, D::Error>
where
    D: Deserializer<'de>,
{
    let children = Option::<Vec<MirrorNode>>::deserialize(deserializer)?;
    Ok(children.filter(|c| !c.is_empty()))
}

impl MirrorNode {
    /// Create a mirror without children
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
            children: None,
        }
    }

    /// Builder method: set children, dropping the field when the list is empty
    pub fn with_children(mut self, children: Vec<MirrorNode>) -> Self {
        self.children = Some(children).filter(|c| !c.is_empty());
        self
    }

    /// Build the mirror of `node` from the mirrors of its children
    pub fn from_source<N: SourceNode>(node: &N, children: Vec<MirrorNode>) -> Self {
        Self::new(node.id(), node.name(), node.node_type()).with_children(children)
    }

    /// Child mirrors in host order, empty when the field is absent
    pub fn children(&self) -> &[MirrorNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    /// Pre-order iterator over this node and its descendants with their depth
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![(self, 0)] }
    }

    /// One-line description, e.g. `TEXT - Title (12:4)`
    pub fn to_simple_string(&self) -> String {
        format!("{} - {} ({})", self.node_type, self.name, self.id)
    }

    /// Canonical compact JSON text
    pub fn to_json(&self) -> Result<String> {
        json::to_string(self)
            .map_err(|e| MirrorError::SerializationFailed(format!("Failed to serialize mirror: {}", e)))
    }

    /// Indented JSON text for display
    pub fn to_json_pretty(&self) -> Result<String> {
        json::to_string_pretty(self)
            .map_err(|e| MirrorError::SerializationFailed(format!("Failed to serialize mirror: {}", e)))
    }

    /// Parse a mirror from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        json::from_str(text)
            .map_err(|e| MirrorError::SerializationFailed(format!("Failed to parse mirror JSON: {}", e)))
    }
}

// Compared in pre-order: equal node sequences with equal child counts
// describe the same tree.
impl PartialEq for MirrorNode {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.iter();
        let mut right = other.iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some((a, _)), Some((b, _))) => {
                    if a.id != b.id
                        || a.name != b.name
                        || a.node_type != b.node_type
                        || a.children().len() != b.children().len()
                    {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl Eq for MirrorNode {}

// Deep trees would otherwise drop recursively, one stack frame per level.
impl Drop for MirrorNode {
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

/// Pre-order iterator returned by [`MirrorNode::iter`]
pub struct Iter<'a> {
    stack: Vec<(&'a MirrorNode, usize)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a MirrorNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_has_no_children_key() {
        let node = MirrorNode::new("1", "Root", "FRAME");
        assert_eq!(node.to_json().unwrap(), r#"{"id":"1","name":"Root","type":"FRAME"}"#);
        assert!(!node.has_children());
    }

    #[test]
    fn test_empty_children_are_dropped() {
        let node = MirrorNode::new("1", "Root", "FRAME").with_children(vec![]);
        assert!(!node.has_children());
        assert!(!node.to_json().unwrap().contains("children"));
    }

    #[test]
    fn test_field_order() {
        let node = MirrorNode::new("1", "Root", "FRAME").with_children(vec![MirrorNode::new("2", "A", "TEXT")]);
        assert_eq!(
            node.to_json().unwrap(),
            r#"{"id":"1","name":"Root","type":"FRAME","children":[{"id":"2","name":"A","type":"TEXT"}]}"#
        );
    }

    #[test]
    fn test_parse_normalizes_empty_children() {
        let node = MirrorNode::from_json(r#"{"id":"1","name":"Root","type":"FRAME","children":[]}"#).unwrap();
        assert!(!node.has_children());
        assert_eq!(node, MirrorNode::new("1", "Root", "FRAME"));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let err = MirrorNode::from_json(r#"{"id":"1","name":"Root"}"#).unwrap_err();
        assert!(matches!(err, MirrorError::SerializationFailed(_)));
    }

    #[test]
    fn test_iter_preorder_with_depth() {
        let tree = MirrorNode::new("a", "A", "FRAME").with_children(vec![
            MirrorNode::new("b", "B", "GROUP").with_children(vec![MirrorNode::new("c", "C", "TEXT")]),
            MirrorNode::new("d", "D", "TEXT"),
        ]);

        let visited: Vec<(&str, usize)> = tree.iter().map(|(n, d)| (n.id.as_str(), d)).collect();
        assert_eq!(visited, vec![("a", 0), ("b", 1), ("c", 2), ("d", 1)]);
    }

    #[test]
    fn test_to_simple_string() {
        let node = MirrorNode::new("12:4", "Title", "TEXT");
        assert_eq!(node.to_simple_string(), "TEXT - Title (12:4)");
    }

    #[test]
    fn test_equality_checks_shape() {
        let a = MirrorNode::new("1", "Root", "FRAME")
            .with_children(vec![MirrorNode::new("2", "A", "GROUP").with_children(vec![MirrorNode::new("3", "B", "TEXT")])]);
        let b = MirrorNode::new("1", "Root", "FRAME")
            .with_children(vec![MirrorNode::new("2", "A", "GROUP"), MirrorNode::new("3", "B", "TEXT")]);
        assert!(a != b);
        assert!(a == a.clone());
    }

    #[test]
    fn test_deep_chain_json_round_trip() {
        let mut node = MirrorNode::new("0", "leaf", "TEXT");
        for i in 1..=10_000 {
            node = MirrorNode::new(i.to_string(), "level", "FRAME").with_children(vec![node]);
        }

        let json = node.to_json().unwrap();
        let parsed = MirrorNode::from_json(&json).unwrap();
        assert!(parsed == node);
        assert_eq!(parsed.iter().map(|(_, depth)| depth).max(), Some(10_000));
        assert!(node.to_json_pretty().unwrap().ends_with('}'));
    }

    #[test]
    fn test_deep_chain_drops() {
        let mut node = MirrorNode::new("0", "leaf", "TEXT");
        for i in 1..100_000 {
            node = MirrorNode::new(i.to_string(), "level", "FRAME").with_children(vec![node]);
        }
        assert_eq!(node.iter().count(), 100_000);
        drop(node);
    }
}
