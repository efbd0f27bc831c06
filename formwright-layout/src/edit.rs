//! Positional insertion of a single element into an existing layout.
//!
//! Insertion only places the element; it does not check nesting. Run the result
//! through [`crate::normalize_layout`] before submitting it.

use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::types::{ElementKind, LayoutNode};

/// Where [`insert_element`] puts the new element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// Append at top level.
    End,
    /// Insert at a top-level index, clamped to the layout length.
    Index(usize),
    /// Insert at a row index inside a top-level group.
    InGroup { group_code: String, index: usize },
    /// Next to the row child with this code, searching rows and groups.
    /// Appends at top level when no such child exists.
    Before(String),
    After(String),
}

/// Return a copy of `tree` with `element` inserted at `position`.
///
/// Elements that cannot stand on their own at the target level are wrapped in
/// a new row.
pub fn insert_element(
    tree: &[LayoutNode],
    element: LayoutNode,
    position: &Position,
) -> Result<Vec<LayoutNode>> {
    let mut out = tree.to_vec();

    match position {
        Position::End => out.push(wrap_for_top_level(element)),
        Position::Index(index) => {
            let index = (*index).min(out.len());
            out.insert(index, wrap_for_top_level(element));
        }
        Position::InGroup { group_code, index } => {
            let group = out
                .iter_mut()
                .find_map(|node| match node {
                    LayoutNode::Group(group) if &group.code == group_code => Some(group),
                    _ => None,
                })
                .ok_or_else(|| LayoutError::GroupNotFound {
                    code: group_code.clone(),
                })?;
            let index = (*index).min(group.children.len());
            group.children.insert(index, wrap_in_row(element));
        }
        Position::Before(code) | Position::After(code) => {
            let after = matches!(position, Position::After(_));
            let mut pending = Some(element);
            insert_near(&mut out, code, after, &mut pending);
            if let Some(element) = pending {
                debug!(%code, "insertion target not found; appending");
                out.push(wrap_for_top_level(element));
            }
        }
    }

    Ok(out)
}

/// Insert `pending` next to the first row child coded `code`. Leaves `pending`
/// as `Some` when no such child exists.
fn insert_near(
    nodes: &mut [LayoutNode],
    code: &str,
    after: bool,
    pending: &mut Option<LayoutNode>,
) {
    for node in nodes {
        if pending.is_none() {
            return;
        }
        match node {
            LayoutNode::Row(row) => {
                if let Some(found) = row.children.iter().position(|c| c.code() == Some(code)) {
                    let index = if after { found + 1 } else { found };
                    if let Some(element) = pending.take() {
                        row.children.insert(index, element);
                    }
                }
            }
            LayoutNode::Group(group) => insert_near(&mut group.children, code, after, pending),
            _ => {}
        }
    }
}

fn wrap_for_top_level(element: LayoutNode) -> LayoutNode {
    match element.kind() {
        ElementKind::Row | ElementKind::Group | ElementKind::Subtable => element,
        _ => LayoutNode::row(vec![element]),
    }
}

fn wrap_in_row(element: LayoutNode) -> LayoutNode {
    match element.kind() {
        ElementKind::Row => element,
        _ => LayoutNode::row(vec![element]),
    }
}
