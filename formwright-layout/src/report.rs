//! The `normalize_layout` entry point and its report.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::Result;
use crate::existence::{check_fields, FieldCheck};
use crate::normalize::{normalize, Normalized};
use crate::types::LayoutNode;
use crate::wire;

/// Corrected layout plus everything that was changed or is still unresolved.
///
/// `warnings` alone mean the layout was repaired and can be applied. Any
/// `errors` mean it cannot be applied until the named fields exist.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub corrected_tree: Vec<LayoutNode>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportJson<'a> {
    corrected_tree: Value,
    warnings: &'a [String],
    errors: &'a [String],
}

impl LayoutReport {
    /// Combine normalizer output with the existence check of its tree.
    /// Malformed-node errors come first, then missing fields.
    pub fn build(normalized: Normalized, check: FieldCheck) -> Self {
        let warnings = normalized.repairs.iter().map(ToString::to_string).collect();
        let errors = normalized
            .malformed
            .iter()
            .map(ToString::to_string)
            .chain(check.missing.iter().map(ToString::to_string))
            .collect();

        Self {
            corrected_tree: normalized.tree,
            warnings,
            errors,
        }
    }

    /// True when nothing blocks submitting the corrected tree.
    pub fn is_applicable(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when the corrected tree differs from what was requested.
    pub fn was_repaired(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Render as `{ correctedTree, warnings, errors }` with the tree in the
    /// host platform's layout format.
    pub fn to_json(&self) -> Result<Value> {
        let json = ReportJson {
            corrected_tree: wire::to_json(&self.corrected_tree),
            warnings: &self.warnings,
            errors: &self.errors,
        };
        Ok(serde_json::to_value(json)?)
    }
}

/// Repair `tree` and check every reference against `known_field_codes`.
pub fn normalize_layout(tree: Vec<LayoutNode>, known_field_codes: &HashSet<String>) -> LayoutReport {
    debug!(
        top_level = tree.len(),
        known = known_field_codes.len(),
        "normalizing layout"
    );

    let normalized = normalize(tree);
    let check = check_fields(&normalized.tree, known_field_codes);
    let report = LayoutReport::build(normalized, check);

    info!(
        warnings = report.warnings.len(),
        errors = report.errors.len(),
        "layout report built"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_field_yields_error_without_warning() {
        let tree = vec![LayoutNode::row(vec![LayoutNode::field(
            "unknown_code",
            "SINGLE_LINE_TEXT",
        )])];

        let report = normalize_layout(tree, &HashSet::new());

        assert!(report.warnings.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("unknown_code"));
        assert!(!report.is_applicable());
    }

    #[test]
    fn malformed_errors_precede_missing_fields() {
        let tree = vec![
            LayoutNode::row(vec![LayoutNode::field("ghost", "NUMBER")]),
            LayoutNode::row(vec![LayoutNode::field("", "NUMBER")]),
        ];

        let report = normalize_layout(tree, &HashSet::new());

        assert_eq!(
            report.errors,
            vec![
                "malformed field at layout[1].fields[0]: missing code",
                "field code 'ghost' not found; it must be created before being placed in the layout",
            ]
        );
        assert_eq!(report.corrected_tree.len(), 2);
    }

    #[test]
    fn renders_host_json() {
        let known: HashSet<String> = ["a".to_string()].into();
        let tree = vec![LayoutNode::row(vec![
            LayoutNode::field("a", "NUMBER"),
            LayoutNode::group("g", vec![]),
        ])];

        let report = normalize_layout(tree, &known);

        assert!(report.was_repaired());
        assert_eq!(
            report.to_json().unwrap(),
            json!({
                "correctedTree": [
                    {"type": "ROW", "fields": [{"type": "NUMBER", "code": "a"}]},
                    {"type": "GROUP", "code": "g", "openGroup": true}
                ],
                "warnings": ["relocated group 'g' from inside a row to top level"],
                "errors": ["field code 'g' not found; it must be created before being placed in the layout"]
            })
        );
    }
}
