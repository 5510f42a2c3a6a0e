use crate::{
    error::{MirrorError, Result},
    mirror::node::MirrorNode,
    traversal::{SourceNode, Visit, Walker},
};

/// Build the mirror of a source tree
///
/// Mirrors are composed post-order: a node's mirror is created when the walk
/// exits it, from the mirrors its children produced. The first traversal
/// error aborts the build and no partial tree is returned.
pub fn build<N: SourceNode>(root: &N) -> Result<MirrorNode> {
    // One sibling list per node currently entered.
    let mut levels: Vec<Vec<MirrorNode>> = Vec::new();
    let mut finished = None;

    for visit in Walker::new(root) {
        match visit? {
            Visit::Enter { .. } => levels.push(Vec::new()),
            Visit::Exit { node, .. } => {
                let children = levels.pop().unwrap_or_default();
                let mirror = MirrorNode::from_source(node, children);
                match levels.last_mut() {
                    Some(siblings) => siblings.push(mirror),
                    None => finished = Some(mirror),
                }
            }
        }
    }

    finished.ok_or_else(|| MirrorError::MalformedNode {
        id: root.id().into_owned(),
        reason: "walk ended before the root was completed".to_string(),
    })
}
