//! Minimum-width correction for fields the host cannot render narrow.

use tracing::debug;

use crate::config::LayoutConfig;
use crate::fields::FieldDefinitions;
use crate::types::{LayoutNode, Size};

/// Output of [`correct_widths`].
#[derive(Debug, Clone, PartialEq)]
pub struct WidthCorrection {
    pub tree: Vec<LayoutNode>,
    /// One message per lookup field whose width was raised.
    pub guidance: Vec<String>,
}

/// Raise lookup fields to `config.lookup_min_width` and any field with a
/// recommended minimum to that minimum. Rows at top level and inside groups
/// are corrected; subtable columns are left alone.
pub fn correct_widths(
    tree: Vec<LayoutNode>,
    definitions: &FieldDefinitions,
    config: &LayoutConfig,
) -> WidthCorrection {
    let mut guidance = Vec::new();
    let tree = tree
        .into_iter()
        .map(|node| correct_node(node, definitions, config, &mut guidance))
        .collect();
    WidthCorrection { tree, guidance }
}

fn correct_node(
    node: LayoutNode,
    definitions: &FieldDefinitions,
    config: &LayoutConfig,
    guidance: &mut Vec<String>,
) -> LayoutNode {
    match node {
        LayoutNode::Row(mut row) => {
            for child in &mut row.children {
                if let LayoutNode::Field(field) = child {
                    let Some(def) = definitions.get(&field.code) else {
                        continue;
                    };
                    let size = field.size.get_or_insert_with(Size::default);

                    if def.is_lookup() {
                        let min = config.lookup_min_width;
                        if let Some(old) = raise_width(size, min) {
                            guidance.push(format!(
                                "lookup field '{}' needs an explicit width of at least {min}; width set from {old} to {min}",
                                field.code
                            ));
                        }
                    }
                    if let Some(min) = def.recommended_min_width {
                        if let Some(old) = raise_width(size, min) {
                            debug!(code = %field.code, %old, min, "raised field width");
                        }
                    }
                    if size.is_empty() {
                        field.size = None;
                    }
                }
            }
            LayoutNode::Row(row)
        }
        LayoutNode::Group(mut group) => {
            group.children = group
                .children
                .into_iter()
                .map(|child| correct_node(child, definitions, config, guidance))
                .collect();
            LayoutNode::Group(group)
        }
        other => other,
    }
}

/// Set `size.width` to `min` when unset or smaller. Returns the previous width
/// rendered for messages when a change was made.
fn raise_width(size: &mut Size, min: u32) -> Option<String> {
    match size.width {
        Some(width) if width >= min => None,
        previous => {
            size.width = Some(min);
            Some(previous.map_or_else(|| "unset".to_string(), |w| w.to_string()))
        }
    }
}
