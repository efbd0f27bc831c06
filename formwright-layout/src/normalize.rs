//! Structural repair of candidate layouts.
//!
//! The normalizer consumes a candidate tree and produces one that satisfies the
//! nesting rules in [`crate::constraints`]. It never fails: groups and subtables
//! nested where the renderer cannot draw them are moved to top level right after
//! the top-level container they were found in, other misplaced nodes are
//! dropped, and every action is recorded as a [`Repair`]. Nodes lacking a
//! mandatory attribute are excluded and recorded as [`MalformedNode`]s.
//!
//! Children are normalized before their parent's placement is decided, so a
//! relocated subtree arrives at top level already repaired and the result is a
//! fixed point: normalizing it again changes nothing.

use std::fmt;

use tracing::{debug, warn};

use crate::constraints::{child_context, disposition, Context, Disposition};
use crate::types::{ElementKind, LayoutNode};
use crate::walker::NodePath;

/// A structural change made to the candidate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Repair {
    /// A group or subtable was moved out of a row or group.
    Relocated {
        kind: ElementKind,
        code: String,
        from: Context,
        path: NodePath,
    },
    /// A group nested in a subtable was dropped with its contents.
    RemovedFromSubtable {
        code: String,
        path: NodePath,
        removed: usize,
    },
    /// A node not allowed in its context was dropped with its contents.
    RemovedUnrecognized {
        kind: ElementKind,
        path: NodePath,
        removed: usize,
    },
}

impl Repair {
    /// Number of input nodes this repair took out of the tree.
    pub fn removed_nodes(&self) -> usize {
        match self {
            Repair::Relocated { .. } => 0,
            Repair::RemovedFromSubtable { removed, .. }
            | Repair::RemovedUnrecognized { removed, .. } => *removed,
        }
    }
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repair::Relocated {
                kind, code, from, ..
            } => write!(f, "relocated {kind} '{code}' from {from} to top level"),
            Repair::RemovedFromSubtable { code, .. } => write!(
                f,
                "removed group '{code}' from inside a subtable: unsupported nesting"
            ),
            Repair::RemovedUnrecognized { path, .. } => {
                write!(f, "removed unrecognized element at {path}")
            }
        }
    }
}

/// A node excluded because it lacks a mandatory attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedNode {
    pub kind: ElementKind,
    pub attribute: &'static str,
    pub path: NodePath,
    /// Size of the excluded subtree.
    pub removed: usize,
}

impl fmt::Display for MalformedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "malformed {} at {}: missing {}",
            self.kind, self.path, self.attribute
        )
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub tree: Vec<LayoutNode>,
    /// Repairs in the order they were made.
    pub repairs: Vec<Repair>,
    pub malformed: Vec<MalformedNode>,
}

impl Normalized {
    /// True when the input already satisfied every rule.
    pub fn is_unchanged(&self) -> bool {
        self.repairs.is_empty() && self.malformed.is_empty()
    }
}

/// Repair `tree` so that it satisfies every nesting rule.
pub fn normalize(tree: Vec<LayoutNode>) -> Normalized {
    let mut normalizer = Normalizer::default();
    let mut out = Vec::with_capacity(tree.len());

    for (index, node) in tree.into_iter().enumerate() {
        let path = NodePath::root(index);
        let mut extracted = Vec::new();
        if let Some(node) = normalizer.place(node, Context::TopLevel, &path, &mut extracted) {
            out.push(node);
        }
        out.extend(extracted);
    }

    debug!(
        nodes = out.len(),
        repairs = normalizer.repairs.len(),
        malformed = normalizer.malformed.len(),
        "layout normalized"
    );

    Normalized {
        tree: out,
        repairs: normalizer.repairs,
        malformed: normalizer.malformed,
    }
}

#[derive(Default)]
struct Normalizer {
    repairs: Vec<Repair>,
    malformed: Vec<MalformedNode>,
}

impl Normalizer {
    /// Decide what happens to `node` found in `context`.
    ///
    /// Returns the repaired node when it stays in place. Relocated subtrees are
    /// appended to `extracted` in pre-order.
    fn place(
        &mut self,
        node: LayoutNode,
        context: Context,
        path: &NodePath,
        extracted: &mut Vec<LayoutNode>,
    ) -> Option<LayoutNode> {
        let kind = node.kind();

        if let Some(attribute) = node.missing_attribute() {
            warn!(%kind, %path, attribute, "excluding malformed layout element");
            self.malformed.push(MalformedNode {
                kind,
                attribute,
                path: path.clone(),
                removed: node.subtree_len(),
            });
            return None;
        }

        match disposition(kind, context) {
            Disposition::Keep => Some(self.repair_children(node, path, extracted)),
            Disposition::Relocate => {
                let code = node.code().unwrap_or_default().to_string();
                warn!(%kind, %code, %path, from = %context, "relocating to top level");
                self.repairs.push(Repair::Relocated {
                    kind,
                    code,
                    from: context,
                    path: path.clone(),
                });
                let mut nested = Vec::new();
                let node = self.repair_children(node, path, &mut nested);
                extracted.push(node);
                extracted.extend(nested);
                None
            }
            Disposition::DropUnsupported => {
                let code = node.code().unwrap_or_default().to_string();
                warn!(%kind, %code, %path, "removing group nested in subtable");
                self.repairs.push(Repair::RemovedFromSubtable {
                    code,
                    path: path.clone(),
                    removed: node.subtree_len(),
                });
                None
            }
            Disposition::DropUnrecognized => {
                warn!(%kind, %path, %context, "removing element not allowed here");
                self.repairs.push(Repair::RemovedUnrecognized {
                    kind,
                    path: path.clone(),
                    removed: node.subtree_len(),
                });
                None
            }
        }
    }

    fn repair_children(
        &mut self,
        node: LayoutNode,
        path: &NodePath,
        extracted: &mut Vec<LayoutNode>,
    ) -> LayoutNode {
        let kind = node.kind();
        let Some(context) = child_context(kind) else {
            return node;
        };

        match node {
            LayoutNode::Row(mut row) => {
                row.children = self.place_all(row.children, kind, context, path, extracted);
                LayoutNode::Row(row)
            }
            LayoutNode::Group(mut group) => {
                group.children = self.place_all(group.children, kind, context, path, extracted);
                LayoutNode::Group(group)
            }
            LayoutNode::Subtable(mut subtable) => {
                subtable.children =
                    self.place_all(subtable.children, kind, context, path, extracted);
                LayoutNode::Subtable(subtable)
            }
            other => other,
        }
    }

    fn place_all(
        &mut self,
        children: Vec<LayoutNode>,
        parent: ElementKind,
        context: Context,
        path: &NodePath,
        extracted: &mut Vec<LayoutNode>,
    ) -> Vec<LayoutNode> {
        let mut kept = Vec::with_capacity(children.len());
        for (index, child) in children.into_iter().enumerate() {
            let child_path = path.child(parent, index);
            if let Some(child) = self.place(child, context, &child_path, extracted) {
                kept.push(child);
            }
        }
        kept
    }
}
