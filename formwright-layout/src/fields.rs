//! Field definitions as the host's field settings API describes them.
//!
//! Only what layout work needs is modelled: code, type, label, whether the
//! field is a lookup, and an optional recommended minimum width. Everything
//! else in a definition is ignored on decode.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::types::is_system_field_type;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub code: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Lookup settings; presence alone marks a lookup field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup: Option<Value>,
    #[serde(
        default,
        rename = "_recommendedMinWidth",
        skip_serializing_if = "Option::is_none"
    )]
    pub recommended_min_width: Option<u32>,
}

impl FieldDefinition {
    pub fn new(code: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            field_type: field_type.into(),
            label: None,
            lookup: None,
            recommended_min_width: None,
        }
    }

    pub fn is_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    pub fn is_system(&self) -> bool {
        is_system_field_type(&self.field_type)
    }
}

/// An app's field definitions, in a stable order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDefinitions {
    defs: Vec<FieldDefinition>,
}

impl FieldDefinitions {
    pub fn new(defs: Vec<FieldDefinition>) -> Self {
        Self { defs }
    }

    /// Decode a `properties` map keyed by field code, or a full response
    /// object carrying one. Definitions without a `code` take their key.
    pub fn from_properties(value: &Value) -> Result<Self> {
        let properties = value.get("properties").unwrap_or(value);
        let mut defs = Vec::new();
        if let Value::Object(map) = properties {
            for (key, def) in map {
                let mut def = def.clone();
                if let Value::Object(obj) = &mut def {
                    obj.entry("code").or_insert_with(|| Value::String(key.clone()));
                }
                defs.push(serde_json::from_value(def)?);
            }
        }
        Ok(Self { defs })
    }

    pub fn get(&self, code: &str) -> Option<&FieldDefinition> {
        self.defs.iter().find(|d| d.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.defs.iter()
    }

    /// Codes of every defined field, suitable as the known-code set.
    pub fn codes(&self) -> HashSet<String> {
        self.defs.iter().map(|d| d.code.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_properties_response() {
        let response = json!({
            "properties": {
                "customer": {
                    "type": "SINGLE_LINE_TEXT",
                    "code": "customer",
                    "label": "Customer",
                    "lookup": {"relatedApp": {"app": "12"}, "relatedKeyField": "name"}
                },
                "record_no": {"type": "RECORD_NUMBER", "label": "Record number"},
                "amount": {"type": "NUMBER", "code": "amount", "_recommendedMinWidth": 180}
            },
            "revision": "5"
        });

        let defs = FieldDefinitions::from_properties(&response).unwrap();

        assert_eq!(defs.len(), 3);
        assert!(defs.get("customer").unwrap().is_lookup());
        assert!(defs.get("record_no").unwrap().is_system());
        assert_eq!(defs.get("amount").unwrap().recommended_min_width, Some(180));
        assert!(defs.codes().contains("record_no"));
        let order: Vec<_> = defs.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(order, vec!["customer", "record_no", "amount"]);
    }

    #[test]
    fn missing_type_is_an_error() {
        let props = json!({"broken": {"label": "no type"}});
        assert!(FieldDefinitions::from_properties(&props).is_err());
    }
}
