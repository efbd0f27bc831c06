//! Conversion between the host platform's JSON form layout and [`LayoutNode`].
//!
//! The host represents every element as an object with a `type` tag. Plain
//! fields use their field type (`NUMBER`, `DATE`, ...) as the tag, so decoding
//! consults [`FIELD_TYPES`]; tags that are neither an element nor a field type
//! decode as [`Unrecognized`] and are left for the normalizer to remove.
//!
//! Decoding is lenient about shape where the host's own tooling is: a lone
//! element where an array is expected is treated as a one-element array, and a
//! group given `fields` instead of `layout` gets those fields wrapped in a row.
//! A missing `code` decodes as an empty code so the normalizer reports it.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::types::{
    ElementKind, FieldElement, Group, HorizontalRule, Label, LayoutNode, ReferenceTable, Row,
    Size, Spacer, Subtable, Unrecognized, FIELD_TYPES,
};
use crate::walker::NodePath;

/// Decode a layout with default settings.
pub fn from_json(value: &Value) -> Result<Vec<LayoutNode>> {
    from_json_with(value, &LayoutConfig::default())
}

/// Decode a layout; groups without `openGroup` take `config.open_groups_by_default`.
pub fn from_json_with(value: &Value, config: &LayoutConfig) -> Result<Vec<LayoutNode>> {
    let decoder = Decoder { config };
    let tree = members(value)
        .iter()
        .enumerate()
        .map(|(index, element)| decoder.node(element, &NodePath::root(index)))
        .collect::<Result<Vec<_>>>()?;
    debug!(top_level = tree.len(), "layout decoded");
    Ok(tree)
}

/// Parse and decode a JSON layout document.
pub fn parse_layout(text: &str) -> Result<Vec<LayoutNode>> {
    let value: Value = serde_json::from_str(text)?;
    from_json(&value)
}

/// Encode a layout in the host's format.
pub fn to_json(tree: &[LayoutNode]) -> Value {
    Value::Array(tree.iter().map(node_to_json).collect())
}

pub fn node_to_json(node: &LayoutNode) -> Value {
    let mut obj = Map::new();
    match node {
        LayoutNode::Row(row) => {
            obj.insert("type".into(), json!("ROW"));
            obj.insert("fields".into(), to_json(&row.children));
        }
        LayoutNode::Group(group) => {
            // The host rejects `label`, and an empty `layout`, on groups in
            // layout updates.
            obj.insert("type".into(), json!("GROUP"));
            obj.insert("code".into(), json!(group.code));
            obj.insert("openGroup".into(), json!(group.open_by_default));
            if !group.children.is_empty() {
                obj.insert("layout".into(), to_json(&group.children));
            }
        }
        LayoutNode::Subtable(subtable) => {
            obj.insert("type".into(), json!("SUBTABLE"));
            obj.insert("code".into(), json!(subtable.code));
            obj.insert("fields".into(), to_json(&subtable.children));
        }
        LayoutNode::Field(field) => {
            obj.insert("type".into(), json!(field.field_type));
            obj.insert("code".into(), json!(field.code));
            insert_size(&mut obj, field.size);
        }
        LayoutNode::Label(label) => {
            obj.insert("type".into(), json!("LABEL"));
            obj.insert("label".into(), json!(label.text));
            insert_element_id(&mut obj, &label.element_id);
            insert_size(&mut obj, label.size);
        }
        LayoutNode::Spacer(spacer) => {
            obj.insert("type".into(), json!("SPACER"));
            insert_element_id(&mut obj, &spacer.element_id);
            insert_size(&mut obj, spacer.size);
        }
        LayoutNode::HorizontalRule(hr) => {
            obj.insert("type".into(), json!("HR"));
            insert_element_id(&mut obj, &hr.element_id);
        }
        LayoutNode::ReferenceTable(reference) => {
            obj.insert("type".into(), json!("REFERENCE_TABLE"));
            obj.insert("code".into(), json!(reference.code));
            insert_size(&mut obj, reference.size);
        }
        LayoutNode::Unrecognized(unknown) => {
            if let Some(type_name) = &unknown.type_name {
                obj.insert("type".into(), json!(type_name));
            }
        }
    }
    Value::Object(obj)
}

fn insert_element_id(obj: &mut Map<String, Value>, element_id: &Option<String>) {
    if let Some(id) = element_id {
        obj.insert("elementId".into(), json!(id));
    }
}

fn insert_size(obj: &mut Map<String, Value>, size: Option<Size>) {
    let Some(size) = size.filter(|s| !s.is_empty()) else {
        return;
    };
    let mut out = Map::new();
    for (key, value) in [
        ("width", size.width),
        ("height", size.height),
        ("innerHeight", size.inner_height),
    ] {
        if let Some(v) = value {
            out.insert(key.into(), json!(v.to_string()));
        }
    }
    obj.insert("size".into(), Value::Object(out));
}

/// Elements of an array-valued member; a lone value counts as one element.
fn members(value: &Value) -> Vec<&Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

struct Decoder<'a> {
    config: &'a LayoutConfig,
}

impl Decoder<'_> {
    fn node(&self, value: &Value, path: &NodePath) -> Result<LayoutNode> {
        let obj = value.as_object().ok_or_else(|| LayoutError::InvalidElement {
            path: path.to_string(),
            reason: format!("expected an object, found {value}"),
        })?;

        let Some(tag) = obj.get("type").and_then(Value::as_str) else {
            return Ok(LayoutNode::Unrecognized(Unrecognized { type_name: None }));
        };

        let node = match tag {
            "ROW" => LayoutNode::Row(Row {
                children: self.children(obj.get("fields"), ElementKind::Row, path)?,
            }),
            "GROUP" => self.group(obj, path)?,
            "SUBTABLE" => self.subtable(obj, path)?,
            "LABEL" => LayoutNode::Label(Label {
                text: match string_attr(obj, "label", path)? {
                    Some(text) => text,
                    None => string_attr(obj, "value", path)?.unwrap_or_default(),
                },
                element_id: string_attr(obj, "elementId", path)?,
                size: size_attr(obj, path)?,
            }),
            "SPACER" => LayoutNode::Spacer(Spacer {
                element_id: string_attr(obj, "elementId", path)?,
                size: size_attr(obj, path)?,
            }),
            "HR" => LayoutNode::HorizontalRule(HorizontalRule {
                element_id: string_attr(obj, "elementId", path)?,
            }),
            "REFERENCE_TABLE" => LayoutNode::ReferenceTable(ReferenceTable {
                code: string_attr(obj, "code", path)?.unwrap_or_default(),
                size: size_attr(obj, path)?,
            }),
            field_type if FIELD_TYPES.contains(&field_type) => LayoutNode::Field(FieldElement {
                code: string_attr(obj, "code", path)?.unwrap_or_default(),
                field_type: field_type.to_string(),
                size: size_attr(obj, path)?,
            }),
            other => LayoutNode::Unrecognized(Unrecognized {
                type_name: Some(other.to_string()),
            }),
        };
        Ok(node)
    }

    fn children(
        &self,
        value: Option<&Value>,
        parent: ElementKind,
        path: &NodePath,
    ) -> Result<Vec<LayoutNode>> {
        let Some(value) = value else {
            return Ok(Vec::new());
        };
        members(value)
            .into_iter()
            .enumerate()
            .map(|(index, child)| self.node(child, &path.child(parent, index)))
            .collect()
    }

    fn group(&self, obj: &Map<String, Value>, path: &NodePath) -> Result<LayoutNode> {
        let code = string_attr(obj, "code", path)?.unwrap_or_default();
        let label = string_attr(obj, "label", path)?.unwrap_or_else(|| code.clone());
        let open_by_default = match obj.get("openGroup") {
            None | Some(Value::Null) => self.config.open_groups_by_default,
            Some(Value::Bool(open)) => *open,
            Some(other) => {
                return Err(LayoutError::InvalidElement {
                    path: path.to_string(),
                    reason: format!("openGroup must be a boolean, found {other}"),
                })
            }
        };

        let children = match (obj.get("layout"), obj.get("fields")) {
            (Some(layout), _) => self.children(Some(layout), ElementKind::Group, path)?,
            (None, Some(fields)) => {
                warn!(%code, %path, "group uses `fields` instead of `layout`; wrapping in a row");
                let row_path = path.child(ElementKind::Group, 0);
                let fields = self.children(Some(fields), ElementKind::Row, &row_path)?;
                if fields.is_empty() {
                    Vec::new()
                } else {
                    vec![LayoutNode::row(fields)]
                }
            }
            (None, None) => Vec::new(),
        };

        Ok(LayoutNode::Group(Group {
            code,
            label,
            open_by_default,
            children,
        }))
    }

    fn subtable(&self, obj: &Map<String, Value>, path: &NodePath) -> Result<LayoutNode> {
        let code = string_attr(obj, "code", path)?.unwrap_or_default();
        let children = match obj.get("fields") {
            // Field definitions keyed by code, as the field settings API returns them.
            Some(Value::Object(by_code)) if !by_code.contains_key("type") => by_code
                .iter()
                .enumerate()
                .map(|(index, (key, def))| {
                    let mut node = self.node(def, &path.child(ElementKind::Subtable, index))?;
                    if let LayoutNode::Field(field) = &mut node {
                        if field.code.is_empty() {
                            field.code = key.clone();
                        }
                    }
                    Ok(node)
                })
                .collect::<Result<Vec<_>>>()?,
            other => self.children(other, ElementKind::Subtable, path)?,
        };
        Ok(LayoutNode::Subtable(Subtable { code, children }))
    }
}

fn string_attr(obj: &Map<String, Value>, key: &str, path: &NodePath) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(LayoutError::InvalidElement {
            path: path.to_string(),
            reason: format!("{key} must be a string, found {other}"),
        }),
    }
}

fn size_attr(obj: &Map<String, Value>, path: &NodePath) -> Result<Option<Size>> {
    let size = match obj.get("size") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(size)) => size,
        Some(other) => {
            return Err(LayoutError::InvalidElement {
                path: path.to_string(),
                reason: format!("size must be an object, found {other}"),
            })
        }
    };
    let size = Size {
        width: dimension(size, "width", path)?,
        height: dimension(size, "height", path)?,
        inner_height: dimension(size, "innerHeight", path)?,
    };
    Ok(Some(size))
}

/// A size value: a positive number, or a string of one with an optional `px`.
fn dimension(
    size: &Map<String, Value>,
    attribute: &'static str,
    path: &NodePath,
) -> Result<Option<u32>> {
    let invalid = |value: &Value| LayoutError::InvalidSize {
        path: path.to_string(),
        attribute,
        value: value.to_string(),
    };

    let parsed = match size.get(attribute) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(value @ Value::String(s)) => {
            let digits = s.trim().trim_end_matches("px").trim();
            digits.parse::<u32>().map_err(|_| invalid(value))?
        }
        Some(value @ Value::Number(n)) => match n.as_u64() {
            Some(v) => u32::try_from(v).map_err(|_| invalid(value))?,
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f > 0.0 && f <= f64::from(u32::MAX) => f as u32,
                _ => return Err(invalid(value)),
            },
        },
        Some(other) => return Err(invalid(other)),
    };

    if parsed == 0 {
        return Err(invalid(&Value::from(parsed)));
    }
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_all_element_kinds() {
        let value = json!([
            {"type": "ROW", "fields": [
                {"type": "NUMBER", "code": "qty", "size": {"width": "120"}},
                {"type": "LABEL", "label": "<b>Notes</b>", "elementId": "l1"},
                {"type": "SPACER", "elementId": "sp", "size": {"width": 40, "height": "20px"}},
                {"type": "HR", "elementId": "hr1"},
                {"type": "REFERENCE_TABLE", "code": "related"}
            ]},
            {"type": "GROUP", "code": "details", "openGroup": false, "layout": [
                {"type": "ROW", "fields": [{"type": "DATE", "code": "due"}]}
            ]},
            {"type": "SUBTABLE", "code": "items", "fields": [
                {"type": "SINGLE_LINE_TEXT", "code": "name"}
            ]}
        ]);

        let tree = from_json(&value).unwrap();

        assert_eq!(tree.len(), 3);
        let row = tree[0].children();
        assert_eq!(
            row[0],
            LayoutNode::Field(FieldElement {
                code: "qty".into(),
                field_type: "NUMBER".into(),
                size: Some(Size {
                    width: Some(120),
                    ..Size::default()
                }),
            })
        );
        assert_eq!(row[1].kind(), ElementKind::Label);
        assert_eq!(
            row[2],
            LayoutNode::Spacer(Spacer {
                element_id: Some("sp".into()),
                size: Some(Size {
                    width: Some(40),
                    height: Some(20),
                    inner_height: None,
                }),
            })
        );
        assert_eq!(row[4], LayoutNode::reference_table("related"));
        match &tree[1] {
            LayoutNode::Group(g) => {
                assert_eq!(g.code, "details");
                assert!(!g.open_by_default);
                assert_eq!(g.children.len(), 1);
            }
            other => panic!("expected group, got {other:?}"),
        }
        assert_eq!(
            tree[2],
            LayoutNode::subtable("items", vec![LayoutNode::field("name", "SINGLE_LINE_TEXT")])
        );
    }

    #[test]
    fn unknown_tags_and_missing_codes_survive_decoding() {
        let value = json!([{"type": "ROW", "fields": [
            {"type": "WIDGET"},
            {"code": "untagged"},
            {"type": "NUMBER"}
        ]}]);

        let tree = from_json(&value).unwrap();
        let row = tree[0].children();

        assert_eq!(
            row[0],
            LayoutNode::Unrecognized(Unrecognized {
                type_name: Some("WIDGET".into())
            })
        );
        assert_eq!(row[1], LayoutNode::Unrecognized(Unrecognized::default()));
        assert_eq!(row[2], LayoutNode::field("", "NUMBER"));
    }

    #[test]
    fn group_fields_are_wrapped_in_a_row() {
        let value = json!({"type": "GROUP", "code": "g", "fields": [
            {"type": "NUMBER", "code": "a"}
        ]});

        let tree = from_json(&value).unwrap();

        assert_eq!(
            tree,
            vec![LayoutNode::group(
                "g",
                vec![LayoutNode::row(vec![LayoutNode::field("a", "NUMBER")])]
            )]
        );
    }

    #[test]
    fn group_open_default_comes_from_config() {
        let config = LayoutConfig {
            open_groups_by_default: false,
            ..LayoutConfig::default()
        };
        let tree = from_json_with(&json!([{"type": "GROUP", "code": "g"}]), &config).unwrap();
        match &tree[0] {
            LayoutNode::Group(g) => assert!(!g.open_by_default),
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn subtable_fields_keyed_by_code() {
        let value = json!({"type": "SUBTABLE", "code": "items", "fields": {
            "zeta": {"type": "NUMBER"},
            "alpha": {"type": "NUMBER", "code": "alpha"},
            "mid": {"type": "DATE"}
        }});

        let tree = from_json(&value).unwrap();
        let codes: Vec<_> = tree[0].children().iter().filter_map(|c| c.code()).collect();

        assert_eq!(codes, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn label_text_prefers_label_over_value() {
        let value = json!([{"type": "ROW", "fields": [
            {"type": "LABEL", "label": "Heading", "value": 7},
            {"type": "LABEL", "value": "Fallback"}
        ]}]);

        let tree = from_json(&value).unwrap();

        assert_eq!(
            tree[0].children(),
            [LayoutNode::label("Heading"), LayoutNode::label("Fallback")]
        );
    }

    #[test]
    fn empty_group_omits_layout() {
        let tree = vec![
            LayoutNode::group("empty", vec![]),
            LayoutNode::group("full", vec![LayoutNode::row(vec![])]),
        ];

        assert_eq!(
            to_json(&tree),
            json!([
                {"type": "GROUP", "code": "empty", "openGroup": true},
                {"type": "GROUP", "code": "full", "openGroup": true, "layout": [
                    {"type": "ROW", "fields": []}
                ]}
            ])
        );
        assert_eq!(from_json(&to_json(&tree)).unwrap(), tree);
    }

    #[test]
    fn invalid_sizes_are_errors() {
        for bad in [json!("wide"), json!(0), json!(-5), json!(1.5), json!(true)] {
            let value = json!([{"type": "ROW", "fields": [
                {"type": "NUMBER", "code": "a", "size": {"width": bad}}
            ]}]);
            let err = from_json(&value).unwrap_err();
            match err {
                LayoutError::InvalidSize {
                    path, attribute, ..
                } => {
                    assert_eq!(path, "layout[0].fields[0]");
                    assert_eq!(attribute, "width");
                }
                other => panic!("expected InvalidSize, got {other:?}"),
            }
        }
    }

    #[test]
    fn non_object_element_is_an_error() {
        let err = from_json(&json!([{"type": "ROW", "fields": ["oops"]}])).unwrap_err();
        assert!(err.to_string().contains("layout[0].fields[0]"));
    }

    #[test]
    fn parse_layout_reports_bad_json() {
        assert!(matches!(
            parse_layout("[{"),
            Err(LayoutError::Json(_))
        ));
    }

    #[test]
    fn encoding_uses_host_shapes() {
        let tree = vec![
            LayoutNode::row(vec![
                LayoutNode::Field(FieldElement {
                    code: "lookup".into(),
                    field_type: "SINGLE_LINE_TEXT".into(),
                    size: Some(Size {
                        width: Some(250),
                        ..Size::default()
                    }),
                }),
                LayoutNode::label("Heading"),
            ]),
            LayoutNode::subtable("items", vec![]),
        ];

        assert_eq!(
            to_json(&tree),
            json!([
                {"type": "ROW", "fields": [
                    {"type": "SINGLE_LINE_TEXT", "code": "lookup", "size": {"width": "250"}},
                    {"type": "LABEL", "label": "Heading"}
                ]},
                {"type": "SUBTABLE", "code": "items", "fields": []}
            ])
        );
    }

    #[test]
    fn decode_of_encoded_layout_is_stable() {
        let tree = vec![
            LayoutNode::row(vec![LayoutNode::field("a", "NUMBER"), LayoutNode::hr()]),
            LayoutNode::group("g", vec![LayoutNode::row(vec![LayoutNode::spacer()])]),
        ];
        assert_eq!(from_json(&to_json(&tree)).unwrap(), tree);
    }
}
