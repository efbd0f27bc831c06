//! Form layout validation and normalization
//!
//! `formwright-layout` takes a candidate form layout (rows, groups, subtables,
//! fields and decorative elements) and turns it into one the host platform's
//! form renderer accepts. It never rejects a layout for bad nesting; it repairs
//! it and says what it changed.
//!
//! # Architecture
//!
//! - **Element model** ([`types`]): a closed sum type of layout nodes
//! - **Constraint table** ([`constraints`]): which kinds may nest where, as `const` data
//! - **Tree walker** ([`walker`]): deterministic pre-order traversal with paths
//! - **Normalizer** ([`normalize`]): relocates or drops misplaced subtrees
//! - **Field-existence checker** ([`existence`]): resolves codes against the app's fields
//! - **Report** ([`report`]): [`normalize_layout`], the single entry point
//!
//! Around the core: JSON mapping to the host format ([`wire`]), width
//! correction for lookup fields ([`width`]), coverage of defined fields
//! ([`coverage`]), positional insertion ([`edit`]) and layout generation
//! ([`builder`]).
//!
//! ```
//! use std::collections::HashSet;
//! use formwright_layout::{normalize_layout, LayoutNode};
//!
//! let tree = vec![LayoutNode::row(vec![
//!     LayoutNode::field("title", "SINGLE_LINE_TEXT"),
//!     LayoutNode::group("details", vec![]),
//! ])];
//! let known: HashSet<String> = ["title".to_string(), "details".to_string()].into();
//!
//! let report = normalize_layout(tree, &known);
//! assert_eq!(report.corrected_tree.len(), 2);
//! assert_eq!(report.warnings.len(), 1);
//! assert!(report.is_applicable());
//! ```

pub mod builder;
pub mod config;
pub mod constraints;
pub mod coverage;
pub mod edit;
pub mod error;
pub mod existence;
pub mod fields;
pub mod normalize;
pub mod report;
pub mod types;
pub mod validate;
pub mod walker;
pub mod width;
pub mod wire;

pub use builder::{build_form_layout, BuildOptions, FieldSpec};
pub use config::LayoutConfig;
pub use constraints::{allowed_child_kinds, Context};
pub use coverage::{append_missing_fields, field_codes_in_layout, fields_missing_from_layout};
pub use edit::{insert_element, Position};
pub use error::{LayoutError, Result};
pub use existence::{check_fields, FieldCheck, FieldStatus, MissingField};
pub use fields::{FieldDefinition, FieldDefinitions};
pub use normalize::{normalize, MalformedNode, Normalized, Repair};
pub use report::{normalize_layout, LayoutReport};
pub use types::{ElementKind, LayoutNode, Size, SYSTEM_FIELD_TYPES};
pub use validate::{validate_layout, Violation};
pub use walker::{walk, NodePath, Visit};
pub use width::{correct_widths, WidthCorrection};
