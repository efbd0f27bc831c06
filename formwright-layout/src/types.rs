//! Layout element model.
//!
//! A form layout is a forest of [`LayoutNode`]s. Containers (rows, groups and
//! subtables) own their children exclusively; nodes have no identity beyond
//! their position. Candidate trees are loosely typed so that invalid nesting
//! coming from callers can be represented and then repaired by the normalizer.

use std::fmt;

/// Field types the platform provides on every app. They never need to be
/// created before they are placed in a layout.
pub const SYSTEM_FIELD_TYPES: [&str; 5] = [
    "RECORD_NUMBER",
    "CREATOR",
    "MODIFIER",
    "CREATED_TIME",
    "UPDATED_TIME",
];

/// Field types that appear in a layout as plain field elements.
pub const FIELD_TYPES: &[&str] = &[
    "SINGLE_LINE_TEXT",
    "MULTI_LINE_TEXT",
    "NUMBER",
    "DATE",
    "TIME",
    "DATETIME",
    "RICH_TEXT",
    "FILE",
    "USER_SELECT",
    "GROUP_SELECT",
    "ORGANIZATION_SELECT",
    "CHECK_BOX",
    "RADIO_BUTTON",
    "DROP_DOWN",
    "MULTI_SELECT",
    "CALC",
    "LINK",
    "STATUS",
    "STATUS_ASSIGNEE",
    "CATEGORY",
    "RELATED_RECORDS",
    "RECORD_NUMBER",
    "CREATOR",
    "MODIFIER",
    "CREATED_TIME",
    "UPDATED_TIME",
];

/// Returns true for the record number, creator, modifier and timestamp types.
pub fn is_system_field_type(field_type: &str) -> bool {
    SYSTEM_FIELD_TYPES.contains(&field_type)
}

/// The kind of a layout node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Row,
    Group,
    Subtable,
    Field,
    Label,
    Spacer,
    HorizontalRule,
    ReferenceTable,
    Unrecognized,
}

impl ElementKind {
    /// Lower-case name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::Row => "row",
            ElementKind::Group => "group",
            ElementKind::Subtable => "subtable",
            ElementKind::Field => "field",
            ElementKind::Label => "label",
            ElementKind::Spacer => "spacer",
            ElementKind::HorizontalRule => "hr",
            ElementKind::ReferenceTable => "reference table",
            ElementKind::Unrecognized => "unrecognized element",
        }
    }

    /// The host platform's `type` tag. Fields carry their own field type
    /// instead, and unrecognized elements have no tag.
    pub const fn tag(self) -> Option<&'static str> {
        match self {
            ElementKind::Row => Some("ROW"),
            ElementKind::Group => Some("GROUP"),
            ElementKind::Subtable => Some("SUBTABLE"),
            ElementKind::Label => Some("LABEL"),
            ElementKind::Spacer => Some("SPACER"),
            ElementKind::HorizontalRule => Some("HR"),
            ElementKind::ReferenceTable => Some("REFERENCE_TABLE"),
            ElementKind::Field | ElementKind::Unrecognized => None,
        }
    }

    /// Labels, spacers and rules: placed freely, never backed by a field.
    pub const fn is_decorative(self) -> bool {
        matches!(
            self,
            ElementKind::Label | ElementKind::Spacer | ElementKind::HorizontalRule
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element dimensions. Unit-less, as the host platform defines them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub inner_height: Option<u32>,
}

impl Size {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.inner_height.is_none()
    }
}

/// A horizontal line of fields and decorative elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub children: Vec<LayoutNode>,
}

/// A collapsible section holding rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub code: String,
    pub label: String,
    pub open_by_default: bool,
    pub children: Vec<LayoutNode>,
}

/// A table whose columns are plain fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtable {
    pub code: String,
    pub children: Vec<LayoutNode>,
}

/// A field placed on the form. `field_type` is the platform's field type
/// keyword such as `NUMBER` or `RECORD_NUMBER`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldElement {
    pub code: String,
    pub field_type: String,
    pub size: Option<Size>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub element_id: Option<String>,
    pub size: Option<Size>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spacer {
    pub element_id: Option<String>,
    pub size: Option<Size>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HorizontalRule {
    pub element_id: Option<String>,
}

/// Placement of a related-records table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    pub code: String,
    pub size: Option<Size>,
}

/// Input element whose tag is neither a layout element nor a field type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unrecognized {
    pub type_name: Option<String>,
}

/// One node of a layout tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    Row(Row),
    Group(Group),
    Subtable(Subtable),
    Field(FieldElement),
    Label(Label),
    Spacer(Spacer),
    HorizontalRule(HorizontalRule),
    ReferenceTable(ReferenceTable),
    Unrecognized(Unrecognized),
}

impl LayoutNode {
    pub fn row(children: Vec<LayoutNode>) -> Self {
        LayoutNode::Row(Row { children })
    }

    /// An open group.
    pub fn group(code: impl Into<String>, children: Vec<LayoutNode>) -> Self {
        let code = code.into();
        LayoutNode::Group(Group {
            label: code.clone(),
            code,
            open_by_default: true,
            children,
        })
    }

    pub fn subtable(code: impl Into<String>, children: Vec<LayoutNode>) -> Self {
        LayoutNode::Subtable(Subtable {
            code: code.into(),
            children,
        })
    }

    pub fn field(code: impl Into<String>, field_type: impl Into<String>) -> Self {
        LayoutNode::Field(FieldElement {
            code: code.into(),
            field_type: field_type.into(),
            size: None,
        })
    }

    pub fn label(text: impl Into<String>) -> Self {
        LayoutNode::Label(Label {
            text: text.into(),
            element_id: None,
            size: None,
        })
    }

    pub fn spacer() -> Self {
        LayoutNode::Spacer(Spacer::default())
    }

    pub fn hr() -> Self {
        LayoutNode::HorizontalRule(HorizontalRule::default())
    }

    pub fn reference_table(code: impl Into<String>) -> Self {
        LayoutNode::ReferenceTable(ReferenceTable {
            code: code.into(),
            size: None,
        })
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            LayoutNode::Row(_) => ElementKind::Row,
            LayoutNode::Group(_) => ElementKind::Group,
            LayoutNode::Subtable(_) => ElementKind::Subtable,
            LayoutNode::Field(_) => ElementKind::Field,
            LayoutNode::Label(_) => ElementKind::Label,
            LayoutNode::Spacer(_) => ElementKind::Spacer,
            LayoutNode::HorizontalRule(_) => ElementKind::HorizontalRule,
            LayoutNode::ReferenceTable(_) => ElementKind::ReferenceTable,
            LayoutNode::Unrecognized(_) => ElementKind::Unrecognized,
        }
    }

    /// The field code this node refers to, for code-bearing kinds.
    pub fn code(&self) -> Option<&str> {
        match self {
            LayoutNode::Group(g) => Some(&g.code),
            LayoutNode::Subtable(s) => Some(&s.code),
            LayoutNode::Field(f) => Some(&f.code),
            LayoutNode::ReferenceTable(r) => Some(&r.code),
            _ => None,
        }
    }

    /// Children of a container; empty for leaves.
    pub fn children(&self) -> &[LayoutNode] {
        match self {
            LayoutNode::Row(r) => &r.children,
            LayoutNode::Group(g) => &g.children,
            LayoutNode::Subtable(s) => &s.children,
            _ => &[],
        }
    }

    /// Name of a mandatory attribute this node lacks, if any. A field whose
    /// type is not one of [`FIELD_TYPES`] lacks its field type.
    pub fn missing_attribute(&self) -> Option<&'static str> {
        match self {
            LayoutNode::Label(l) if l.text.is_empty() => Some("text"),
            _ => match self.code() {
                Some(code) if code.is_empty() => Some("code"),
                _ => match self {
                    LayoutNode::Field(f) if !FIELD_TYPES.contains(&f.field_type.as_str()) => {
                        Some("field type")
                    }
                    _ => None,
                },
            },
        }
    }

    /// Total number of nodes in this subtree, this node included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(LayoutNode::subtree_len)
            .sum::<usize>()
    }
}
