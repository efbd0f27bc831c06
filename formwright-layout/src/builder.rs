//! Building a fresh layout from a flat list of elements.

use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::types::{ElementKind, Group, LayoutNode};

/// One element to place, optionally assigned to a named section.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub element: LayoutNode,
    pub section: Option<String>,
}

impl FieldSpec {
    pub fn new(element: LayoutNode) -> Self {
        Self {
            element,
            section: None,
        }
    }

    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub fields_per_row: usize,
    /// Put each named section into its own open group.
    pub group_by_section: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from(&LayoutConfig::default())
    }
}

impl From<&LayoutConfig> for BuildOptions {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            fields_per_row: config.fields_per_row,
            group_by_section: false,
        }
    }
}

/// Code of the group holding a named section.
pub fn section_group_code(section: &str) -> String {
    let joined = section.split_whitespace().collect::<Vec<_>>().join("_");
    format!("section_{}", joined.to_lowercase())
}

/// Lay `specs` out in rows of `options.fields_per_row`.
///
/// Rows, groups and subtables are placed at top level as given, closing the
/// row being filled. With `group_by_section`, sections become groups in the
/// order they first appear and unsectioned elements stay at top level.
pub fn build_form_layout(specs: Vec<FieldSpec>, options: BuildOptions) -> Result<Vec<LayoutNode>> {
    let per_row = options.fields_per_row.max(1);

    for (index, spec) in specs.iter().enumerate() {
        if let Some(attribute) = spec.element.missing_attribute() {
            return Err(LayoutError::InvalidElement {
                path: format!("fields[{index}]"),
                reason: format!("{} is missing {attribute}", spec.element.kind()),
            });
        }
    }

    if !options.group_by_section {
        let elements = specs.into_iter().map(|s| s.element).collect();
        return Ok(rows_of(elements, per_row));
    }

    let mut sections: Vec<(Option<String>, Vec<LayoutNode>)> = Vec::new();
    for spec in specs {
        match sections.iter().position(|(name, _)| *name == spec.section) {
            Some(index) => sections[index].1.push(spec.element),
            None => sections.push((spec.section, vec![spec.element])),
        }
    }

    let mut layout = Vec::new();
    for (name, elements) in sections {
        let rows = rows_of(elements, per_row);
        match name {
            Some(name) => {
                // Groups hold rows only; containers follow their section.
                let (rows, containers): (Vec<_>, Vec<_>) = rows
                    .into_iter()
                    .partition(|node| node.kind() == ElementKind::Row);
                layout.push(LayoutNode::Group(Group {
                    code: section_group_code(&name),
                    label: name,
                    open_by_default: true,
                    children: rows,
                }));
                layout.extend(containers);
            }
            None => layout.extend(rows),
        }
    }

    debug!(top_level = layout.len(), "built form layout");
    Ok(layout)
}

fn rows_of(elements: Vec<LayoutNode>, per_row: usize) -> Vec<LayoutNode> {
    let mut layout = Vec::new();
    let mut current = Vec::with_capacity(per_row);

    for element in elements {
        match element.kind() {
            ElementKind::Row | ElementKind::Group | ElementKind::Subtable => {
                if !current.is_empty() {
                    layout.push(LayoutNode::row(std::mem::take(&mut current)));
                }
                layout.push(element);
            }
            _ => {
                current.push(element);
                if current.len() == per_row {
                    layout.push(LayoutNode::row(std::mem::take(&mut current)));
                }
            }
        }
    }
    if !current.is_empty() {
        layout.push(LayoutNode::row(current));
    }
    layout
}
