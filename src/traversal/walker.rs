use crate::{error::Result, traversal::source::SourceNode};

/// A single step of a depth-first walk
#[derive(Debug)]
pub enum Visit<'a, N> {
    /// The node is reached, before any of its children
    Enter { node: &'a N, depth: usize },
    /// All of the node's children have been walked
    Exit { node: &'a N, depth: usize },
}

/// Pending work for one node on the walk stack
struct Frame<'a, N> {
    node: &'a N,
    children: &'a [N],
    next: usize,
}

/// Depth-first iterator over a source tree
///
/// Uses a heap-allocated stack of frames, so the call stack does not grow
/// with tree depth. Children are walked in the order the host reports them.
/// After yielding an error the walker is exhausted.
pub struct Walker<'a, N> {
    pending_root: Option<&'a N>,
    stack: Vec<Frame<'a, N>>,
    failed: bool,
}

impl<'a, N: SourceNode> Walker<'a, N> {
    pub fn new(root: &'a N) -> Self {
        Self {
            pending_root: Some(root),
            stack: Vec::new(),
            failed: false,
        }
    }

    /// Push a frame for `node` and return its enter visit
    fn enter(&mut self, node: &'a N) -> Result<Visit<'a, N>> {
        let children = node.kind()?.children();
        let depth = self.stack.len();
        self.stack.push(Frame { node, children, next: 0 });
        Ok(Visit::Enter { node, depth })
    }
}

impl<'a, N: SourceNode> Iterator for Walker<'a, N> {
    type Item = Result<Visit<'a, N>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let step = if let Some(root) = self.pending_root.take() {
            self.enter(root)
        } else {
            let frame = self.stack.last_mut()?;
            let children = frame.children;
            if let Some(child) = children.get(frame.next) {
                frame.next += 1;
                self.enter(child)
            } else {
                let frame = self.stack.pop()?;
                Ok(Visit::Exit {
                    node: frame.node,
                    depth: self.stack.len(),
                })
            }
        };

        if step.is_err() {
            self.failed = true;
            self.stack.clear();
        }
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::MirrorError, traversal::source::NodeKind};
    use std::borrow::Cow;

    /// Minimal node whose children can be marked unreadable
    struct TestNode {
        id: &'static str,
        children: Option<Vec<TestNode>>,
        unreadable: bool,
    }

    impl TestNode {
        fn leaf(id: &'static str) -> Self {
            Self { id, children: None, unreadable: false }
        }

        fn branch(id: &'static str, children: Vec<TestNode>) -> Self {
            Self { id, children: Some(children), unreadable: false }
        }
    }

    impl SourceNode for TestNode {
        fn id(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.id)
        }

        fn name(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.id)
        }

        fn node_type(&self) -> Cow<'_, str> {
            Cow::Borrowed("TEST")
        }

        fn kind(&self) -> Result<NodeKind<'_, Self>> {
            if self.unreadable {
                return Err(MirrorError::MalformedNode {
                    id: self.id.to_string(),
                    reason: "unreadable".to_string(),
                });
            }
            Ok(match &self.children {
                Some(children) => NodeKind::Container(children),
                None => NodeKind::Leaf,
            })
        }
    }

    fn trace(root: &TestNode) -> Vec<String> {
        Walker::new(root)
            .map(|visit| match visit.unwrap() {
                Visit::Enter { node, depth } => format!("+{}@{}", node.id, depth),
                Visit::Exit { node, depth } => format!("-{}@{}", node.id, depth),
            })
            .collect()
    }

    #[test]
    fn test_single_leaf() {
        let root = TestNode::leaf("a");
        assert_eq!(trace(&root), vec!["+a@0", "-a@0"]);
    }

    #[test]
    fn test_order_and_depth() {
        let root = TestNode::branch(
            "a",
            vec![
                TestNode::branch("b", vec![TestNode::leaf("c"), TestNode::leaf("d")]),
                TestNode::branch("e", vec![]),
                TestNode::leaf("f"),
            ],
        );

        assert_eq!(
            trace(&root),
            vec![
                "+a@0", "+b@1", "+c@2", "-c@2", "+d@2", "-d@2", "-b@1", "+e@1", "-e@1", "+f@1", "-f@1", "-a@0",
            ]
        );
    }

    #[test]
    fn test_error_stops_walk() {
        let mut bad = TestNode::leaf("bad");
        bad.unreadable = true;
        let root = TestNode::branch("a", vec![bad, TestNode::leaf("never")]);

        let visits: Vec<_> = Walker::new(&root).collect();
        assert_eq!(visits.len(), 2);
        assert!(visits[0].is_ok());
        assert!(matches!(visits[1], Err(MirrorError::MalformedNode { .. })));
    }
}
