//! Which defined fields a layout places, and which it leaves out.

use tracing::debug;

use crate::fields::FieldDefinitions;
use crate::types::{LayoutNode, FIELD_TYPES};

/// Codes placed by the layout: fields in rows (including rows inside groups),
/// groups and subtables themselves, in traversal order.
pub fn field_codes_in_layout(tree: &[LayoutNode]) -> Vec<String> {
    let mut codes = Vec::new();
    collect_codes(tree, &mut codes);
    codes
}

fn collect_codes(nodes: &[LayoutNode], codes: &mut Vec<String>) {
    for node in nodes {
        match node {
            LayoutNode::Row(row) => codes.extend(
                row.children
                    .iter()
                    .filter_map(LayoutNode::code)
                    .filter(|code| !code.is_empty())
                    .map(str::to_string),
            ),
            LayoutNode::Group(group) => {
                if !group.code.is_empty() {
                    codes.push(group.code.clone());
                }
                collect_codes(&group.children, codes)
            }
            LayoutNode::Subtable(subtable) if !subtable.code.is_empty() => {
                codes.push(subtable.code.clone())
            }
            _ => {}
        }
    }
}

/// Defined, non-system fields the layout does not place, in definition order.
pub fn fields_missing_from_layout(tree: &[LayoutNode], definitions: &FieldDefinitions) -> Vec<String> {
    let placed = field_codes_in_layout(tree);
    definitions
        .iter()
        .filter(|def| !def.is_system())
        .filter(|def| !placed.iter().any(|code| code == &def.code))
        .map(|def| def.code.clone())
        .collect()
}

/// Output of [`append_missing_fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageFix {
    pub tree: Vec<LayoutNode>,
    /// One notice per appended field.
    pub notices: Vec<String>,
}

/// Append every field the layout leaves out: subtables and groups at top level,
/// reference tables and plain fields in a row of their own. Definitions of any
/// other type have no layout element and are skipped.
pub fn append_missing_fields(tree: Vec<LayoutNode>, definitions: &FieldDefinitions) -> CoverageFix {
    let missing = fields_missing_from_layout(&tree, definitions);
    let mut tree = tree;
    let mut notices = Vec::with_capacity(missing.len());

    for code in missing {
        let Some(def) = definitions.get(&code) else {
            continue;
        };
        let (node, noun) = match def.field_type.as_str() {
            "SUBTABLE" => (LayoutNode::subtable(code.clone(), Vec::new()), "subtable"),
            "GROUP" => (LayoutNode::group(code.clone(), Vec::new()), "group"),
            "REFERENCE_TABLE" => (
                LayoutNode::row(vec![LayoutNode::reference_table(code.clone())]),
                "reference table",
            ),
            field_type if FIELD_TYPES.contains(&field_type) => (
                LayoutNode::row(vec![LayoutNode::field(code.clone(), field_type)]),
                "field",
            ),
            other => {
                debug!(%code, field_type = other, "no layout element for field type");
                continue;
            }
        };
        tree.push(node);
        notices.push(format!("added {noun} '{code}' to the layout"));
    }

    debug!(added = notices.len(), "appended fields missing from layout");
    CoverageFix { tree, notices }
}
