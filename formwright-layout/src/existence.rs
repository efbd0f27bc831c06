//! Cross-check of layout references against the app's known field codes.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::types::{is_system_field_type, LayoutNode};
use crate::walker::{walk, NodePath};

/// Classification of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    /// Rows and decorative elements; nothing to look up.
    Ok,
    /// Provided by the platform on every app.
    OkSystem,
    /// Present in the known field codes.
    OkExisting,
    Missing,
}

/// A code referenced by the layout that does not exist on the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    pub code: String,
    pub path: NodePath,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field code '{}' not found; it must be created before being placed in the layout",
            self.code
        )
    }
}

/// Result of [`check_fields`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCheck {
    /// One status per visited node, in traversal order.
    pub statuses: Vec<(NodePath, FieldStatus)>,
    /// Every unresolved reference, in traversal order.
    pub missing: Vec<MissingField>,
}

impl FieldCheck {
    pub fn all_resolved(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Classify one node against `known`.
pub fn classify(node: &LayoutNode, known: &HashSet<String>) -> FieldStatus {
    match node {
        LayoutNode::Field(f) if is_system_field_type(&f.field_type) => FieldStatus::OkSystem,
        LayoutNode::Field(_)
        | LayoutNode::Group(_)
        | LayoutNode::Subtable(_)
        | LayoutNode::ReferenceTable(_) => match node.code() {
            Some(code) if known.contains(code) => FieldStatus::OkExisting,
            _ => FieldStatus::Missing,
        },
        LayoutNode::Row(_)
        | LayoutNode::Label(_)
        | LayoutNode::Spacer(_)
        | LayoutNode::HorizontalRule(_)
        | LayoutNode::Unrecognized(_) => FieldStatus::Ok,
    }
}

/// Check every node of `tree`. Does not stop at the first missing code.
pub fn check_fields(tree: &[LayoutNode], known: &HashSet<String>) -> FieldCheck {
    let mut check = FieldCheck::default();

    walk(tree, |visit| {
        let status = classify(visit.node, known);
        if status == FieldStatus::Missing {
            check.missing.push(MissingField {
                code: visit.node.code().unwrap_or_default().to_string(),
                path: visit.path.clone(),
            });
        }
        check.statuses.push((visit.path.clone(), status));
    });

    debug!(
        checked = check.statuses.len(),
        missing = check.missing.len(),
        "field existence checked"
    );
    check
}
