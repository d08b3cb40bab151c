//! Library metadata tree.
//!
//! Descriptions are trusted markup and are emitted as-is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Rendered in this order.
    pub libraries: Vec<Library>,
}

/// Values, methods and nested classes shared by libraries and classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Members {
    pub values: Vec<Value>,
    pub methods: Vec<Method>,
    pub classes: Vec<Class>,
}

impl Members {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.methods.is_empty() && self.classes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Anchor and `lib/<key>` path.
    pub key: String,
    pub name: String,
    pub file: String,
    #[serde(default)]
    pub import: Vec<String>,
    /// Keys of other libraries this one loads.
    #[serde(default)]
    pub load: Vec<String>,
    #[serde(flatten)]
    pub members: Members,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub key: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    /// Receiver type for `Type::method` forms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub desc: String,
    #[serde(rename = "return", default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    /// Dotted anchors of related entries.
    #[serde(default)]
    pub see: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    pub key: String,
    #[serde(rename = "type", default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(default)]
    pub modifier: String,
    #[serde(flatten)]
    pub members: Members,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_default_to_empty() {
        let lib: Library = serde_json::from_str(
            r#"{"key": "io", "name": "IO Library", "file": "io.so",
                "methods": [{"name": "read", "desc": "Reads.", "return": "String"}]}"#,
        )
        .unwrap();
        assert!(lib.import.is_empty());
        assert!(lib.members.values.is_empty());
        assert!(lib.members.classes.is_empty());
        let method = &lib.members.methods[0];
        assert_eq!(method.returns.as_deref(), Some("String"));
        assert!(method.template.is_none());
        assert!(method.see.is_empty());
        assert!(method.params.is_empty());
    }

    #[test]
    fn test_param_type_list() {
        let param: Param =
            serde_json::from_str(r#"{"modifier": "ref", "key": "x", "type": ["Number", "String"]}"#)
                .unwrap();
        assert_eq!(param.modifier.as_deref(), Some("ref"));
        assert_eq!(param.types, ["Number", "String"]);
    }

    #[test]
    fn test_nested_classes() {
        let class: Class = serde_json::from_str(
            r#"{"name": "Outer", "modifier": "static",
                "classes": [{"name": "Inner", "modifier": "static", "values": [{"key": "PI", "desc": "pi", "value": "3.14"}]}]}"#,
        )
        .unwrap();
        assert_eq!(class.members.classes[0].name, "Inner");
        assert_eq!(class.members.classes[0].members.values[0].value, "3.14");
    }
}
