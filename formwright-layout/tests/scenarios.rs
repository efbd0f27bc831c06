//! End-to-end scenarios for `normalize_layout`.

use std::collections::HashSet;

use formwright_layout::{
    normalize_layout, validate_layout, wire, FieldDefinitions, LayoutNode,
};
use serde_json::json;

fn known(codes: &[&str]) -> HashSet<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

fn field(code: &str) -> LayoutNode {
    LayoutNode::field(code, "SINGLE_LINE_TEXT")
}

#[test]
fn group_inside_row_is_lifted_after_the_row() {
    let g1 = LayoutNode::group("g1", vec![LayoutNode::row(vec![field("b")])]);
    let tree = vec![LayoutNode::row(vec![field("a"), g1.clone()])];

    let report = normalize_layout(tree, &known(&["a", "b", "g1"]));

    assert_eq!(
        report.corrected_tree,
        vec![LayoutNode::row(vec![field("a")]), g1]
    );
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("g1"));
    assert!(report.errors.is_empty());
}

#[test]
fn subtable_inside_group_is_appended_after_the_group() {
    let s1 = LayoutNode::subtable("s1", vec![field("qty")]);
    let tree = vec![LayoutNode::group(
        "g2",
        vec![LayoutNode::row(vec![field("c")]), s1.clone()],
    )];

    let report = normalize_layout(tree, &known(&["g2", "c", "s1", "qty"]));

    assert_eq!(
        report.corrected_tree,
        vec![
            LayoutNode::group("g2", vec![LayoutNode::row(vec![field("c")])]),
            s1
        ]
    );
    assert_eq!(report.warnings.len(), 1);
    assert!(report.errors.is_empty());
}

#[test]
fn group_inside_subtable_is_removed() {
    let tree = vec![LayoutNode::subtable(
        "s2",
        vec![LayoutNode::group("g3", vec![LayoutNode::row(vec![field("z")])])],
    )];

    let report = normalize_layout(tree, &known(&["s2"]));

    assert_eq!(report.corrected_tree, vec![LayoutNode::subtable("s2", vec![])]);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("g3"));
    assert!(report.errors.is_empty());
}

#[test]
fn unknown_field_code_is_an_error() {
    let tree = vec![LayoutNode::row(vec![LayoutNode::field(
        "unknown_code",
        "SINGLE_LINE_TEXT",
    )])];

    let report = normalize_layout(tree, &HashSet::new());

    assert!(report.warnings.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("unknown_code"));
}

#[test]
fn record_number_needs_no_creation() {
    let tree = vec![LayoutNode::row(vec![LayoutNode::field("id", "RECORD_NUMBER")])];

    let report = normalize_layout(tree, &HashSet::new());

    assert!(report.warnings.is_empty());
    assert!(report.errors.is_empty());
}

#[test]
fn valid_tree_is_a_no_op() {
    let tree = vec![
        LayoutNode::row(vec![
            field("title"),
            LayoutNode::label("Customer"),
            LayoutNode::spacer(),
        ]),
        LayoutNode::group(
            "details",
            vec![LayoutNode::row(vec![field("memo"), LayoutNode::hr()])],
        ),
        LayoutNode::subtable("items", vec![field("name")]),
    ];

    let report = normalize_layout(
        tree.clone(),
        &known(&["title", "details", "memo", "items", "name"]),
    );

    assert_eq!(report.corrected_tree, tree);
    assert!(report.warnings.is_empty());
    assert!(report.errors.is_empty());
}

#[test]
fn host_json_in_host_json_out() {
    let request = json!([
        {"type": "ROW", "fields": [
            {"type": "SINGLE_LINE_TEXT", "code": "title", "size": {"width": "200"}},
            {"type": "SUBTABLE", "code": "items", "fields": [
                {"type": "NUMBER", "code": "qty"}
            ]},
            {"type": "CUSTOM_WIDGET"}
        ]},
        {"type": "GROUP", "code": "details", "layout": [
            {"type": "GROUP", "code": "inner", "layout": []}
        ]}
    ]);
    let properties = json!({"properties": {
        "title": {"type": "SINGLE_LINE_TEXT"},
        "items": {"type": "SUBTABLE"},
        "qty": {"type": "NUMBER"},
        "details": {"type": "GROUP"}
    }});
    let defs = FieldDefinitions::from_properties(&properties).unwrap();

    let tree = wire::from_json(&request).unwrap();
    let report = normalize_layout(tree, &defs.codes());

    assert_eq!(
        report.warnings,
        vec![
            "relocated subtable 'items' from inside a row to top level",
            "removed unrecognized element at layout[0].fields[2]",
            "relocated group 'inner' from inside a group to top level",
        ]
    );
    assert_eq!(
        report.errors,
        vec!["field code 'inner' not found; it must be created before being placed in the layout"]
    );
    assert!(validate_layout(&report.corrected_tree).is_empty());
    assert_eq!(
        wire::to_json(&report.corrected_tree),
        json!([
            {"type": "ROW", "fields": [
                {"type": "SINGLE_LINE_TEXT", "code": "title", "size": {"width": "200"}}
            ]},
            {"type": "SUBTABLE", "code": "items", "fields": [
                {"type": "NUMBER", "code": "qty"}
            ]},
            {"type": "GROUP", "code": "details", "openGroup": true},
            {"type": "GROUP", "code": "inner", "openGroup": true}
        ])
    );
}

#[test]
fn field_carrying_a_container_tag_is_an_error() {
    let tree = vec![LayoutNode::row(vec![LayoutNode::field("x", "SUBTABLE")])];

    let report = normalize_layout(tree, &known(&["x"]));

    assert_eq!(report.corrected_tree, vec![LayoutNode::row(vec![])]);
    assert_eq!(
        report.errors,
        vec!["malformed field at layout[0].fields[0]: missing field type"]
    );

    let resent = wire::from_json(&wire::to_json(&report.corrected_tree)).unwrap();
    let second = normalize_layout(resent, &known(&["x"]));
    assert!(second.warnings.is_empty());
    assert!(second.errors.is_empty());
}
