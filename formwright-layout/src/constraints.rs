//! Nesting rules of the host form renderer.
//!
//! The table is fixed at compile time. Every [`ElementKind`] is matched
//! exhaustively so adding a kind forces a decision here.

use std::fmt;

use crate::types::ElementKind;

/// Where a node sits in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    TopLevel,
    InsideRow,
    InsideGroup,
    InsideSubtable,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Context::TopLevel => "at top level",
            Context::InsideRow => "inside a row",
            Context::InsideGroup => "inside a group",
            Context::InsideSubtable => "inside a subtable",
        })
    }
}

const TOP_LEVEL: &[ElementKind] = &[ElementKind::Row, ElementKind::Group, ElementKind::Subtable];

const INSIDE_ROW: &[ElementKind] = &[
    ElementKind::Field,
    ElementKind::Label,
    ElementKind::Spacer,
    ElementKind::HorizontalRule,
    ElementKind::ReferenceTable,
];

const INSIDE_GROUP: &[ElementKind] = &[ElementKind::Row];

const INSIDE_SUBTABLE: &[ElementKind] = &[ElementKind::Field];

/// Kinds permitted as children in `context`.
pub const fn allowed_child_kinds(context: Context) -> &'static [ElementKind] {
    match context {
        Context::TopLevel => TOP_LEVEL,
        Context::InsideRow => INSIDE_ROW,
        Context::InsideGroup => INSIDE_GROUP,
        Context::InsideSubtable => INSIDE_SUBTABLE,
    }
}

pub fn is_allowed(kind: ElementKind, context: Context) -> bool {
    allowed_child_kinds(context).contains(&kind)
}

/// The context a container's children live in. `None` for leaf kinds.
pub const fn child_context(kind: ElementKind) -> Option<Context> {
    match kind {
        ElementKind::Row => Some(Context::InsideRow),
        ElementKind::Group => Some(Context::InsideGroup),
        ElementKind::Subtable => Some(Context::InsideSubtable),
        ElementKind::Field
        | ElementKind::Label
        | ElementKind::Spacer
        | ElementKind::HorizontalRule
        | ElementKind::ReferenceTable
        | ElementKind::Unrecognized => None,
    }
}

/// What the normalizer does with a node of `kind` found in `context`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Keep,
    /// Move the subtree to top level after its top-level container.
    Relocate,
    /// Subtable cannot host a group.
    DropUnsupported,
    DropUnrecognized,
}

pub fn disposition(kind: ElementKind, context: Context) -> Disposition {
    if is_allowed(kind, context) {
        return Disposition::Keep;
    }
    match (context, kind) {
        (Context::InsideRow | Context::InsideGroup, ElementKind::Group | ElementKind::Subtable) => {
            Disposition::Relocate
        }
        (Context::InsideSubtable, ElementKind::Group) => Disposition::DropUnsupported,
        _ => Disposition::DropUnrecognized,
    }
}
