//! Read-only pre-order traversal of a layout tree.

use std::fmt;

use tracing::trace;

use crate::constraints::{child_context, Context};
use crate::types::{ElementKind, LayoutNode};

/// Position of a node, rendered in the host JSON vocabulary, e.g.
/// `layout[2].layout[0].fields[1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<(&'static str, usize)>,
}

impl NodePath {
    /// Path of a top-level node.
    pub fn root(index: usize) -> Self {
        Self {
            segments: vec![("layout", index)],
        }
    }

    /// Path of the `index`-th child of the node at `self`, which has kind `parent`.
    pub fn child(&self, parent: ElementKind, index: usize) -> Self {
        let member = match parent {
            ElementKind::Group => "layout",
            _ => "fields",
        };
        let mut segments = self.segments.clone();
        segments.push((member, index));
        Self { segments }
    }

    /// Index of the top-level node this path descends from.
    pub fn top_level_index(&self) -> usize {
        self.segments.first().map(|(_, i)| *i).unwrap_or(0)
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, (member, index)) in self.segments.iter().enumerate() {
            if n > 0 {
                f.write_str(".")?;
            }
            write!(f, "{member}[{index}]")?;
        }
        Ok(())
    }
}

/// What the visitor sees for each node.
#[derive(Debug)]
pub struct Visit<'a> {
    pub node: &'a LayoutNode,
    /// Kind of the containing node; `None` at top level.
    pub parent: Option<ElementKind>,
    /// Context the node sits in.
    pub context: Context,
    pub path: &'a NodePath,
}

/// Visit every node in pre-order, siblings in insertion order.
pub fn walk<F>(tree: &[LayoutNode], mut visitor: F)
where
    F: FnMut(&Visit<'_>),
{
    for (index, node) in tree.iter().enumerate() {
        let path = NodePath::root(index);
        walk_node(node, None, Context::TopLevel, &path, &mut visitor);
    }
}

fn walk_node<F>(
    node: &LayoutNode,
    parent: Option<ElementKind>,
    context: Context,
    path: &NodePath,
    visitor: &mut F,
) where
    F: FnMut(&Visit<'_>),
{
    trace!(%path, kind = %node.kind(), "visit");
    visitor(&Visit {
        node,
        parent,
        context,
        path,
    });

    let kind = node.kind();
    if let Some(inner) = child_context(kind) {
        for (index, child) in node.children().iter().enumerate() {
            let child_path = path.child(kind, index);
            walk_node(child, Some(kind), inner, &child_path, visitor);
        }
    }
}
