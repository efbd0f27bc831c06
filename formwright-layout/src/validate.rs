//! Detection of nesting violations without repairing them.

use std::fmt;

use crate::constraints::{is_allowed, Context};
use crate::types::{ElementKind, LayoutNode};
use crate::walker::{walk, NodePath};

/// A node that breaks a layout rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Misplaced {
        kind: ElementKind,
        context: Context,
        path: NodePath,
    },
    Malformed {
        kind: ElementKind,
        attribute: &'static str,
        path: NodePath,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Misplaced {
                kind,
                context,
                path,
            } => write!(f, "{kind} at {path} is not allowed {context}"),
            Violation::Malformed {
                kind,
                attribute,
                path,
            } => write!(f, "{kind} at {path} is missing {attribute}"),
        }
    }
}

/// Every violation in `tree`, in traversal order. Empty for normalized trees.
pub fn validate_layout(tree: &[LayoutNode]) -> Vec<Violation> {
    let mut violations = Vec::new();
    walk(tree, |visit| {
        let kind = visit.node.kind();
        if !is_allowed(kind, visit.context) {
            violations.push(Violation::Misplaced {
                kind,
                context: visit.context,
                path: visit.path.clone(),
            });
        }
        if let Some(attribute) = visit.node.missing_attribute() {
            violations.push(Violation::Malformed {
                kind,
                attribute,
                path: visit.path.clone(),
            });
        }
    });
    violations
}
