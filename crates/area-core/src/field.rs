//! # Parameter Schema
//!
//! The server describes each area parameter with a `type` string and a
//! loosely typed `values` list whose meaning depends on that type. On the
//! client side the pair is folded into [`FieldKind`], so every consumer
//! matches on a closed set of variants instead of comparing strings.

use serde::{Deserialize, Serialize};

use crate::service::null_as_default;

/// What kind of input a parameter needs, with the data that kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line free text (`string`, `text`, and any unknown type).
    Text,
    /// Multi-line free text (`long_string`).
    LongText,
    Email,
    /// Integer input (`number`).
    Number,
    /// Date typed as text (`date`).
    Date,
    /// Fixed option list (`select`).
    Select { options: Vec<String> },
    /// Options fetched from a service proxy endpoint (`select_uri`). The
    /// endpoint may contain `${field}` placeholders.
    RemoteSelect { endpoint: String },
}

impl FieldKind {
    /// Build a kind from the server's `type` string and `values` list.
    pub fn from_wire(type_name: &str, values: Vec<String>) -> Self {
        match type_name {
            "long_string" => FieldKind::LongText,
            "email" => FieldKind::Email,
            "number" => FieldKind::Number,
            "date" => FieldKind::Date,
            "select" => FieldKind::Select { options: values },
            "select_uri" => FieldKind::RemoteSelect {
                endpoint: values.into_iter().next().unwrap_or_default(),
            },
            _ => FieldKind::Text,
        }
    }

    /// The server's `type` string and `values` list for this kind.
    pub fn to_wire(&self) -> (&'static str, Vec<String>) {
        match self {
            FieldKind::Text => ("string", Vec::new()),
            FieldKind::LongText => ("long_string", Vec::new()),
            FieldKind::Email => ("email", Vec::new()),
            FieldKind::Number => ("number", Vec::new()),
            FieldKind::Date => ("date", Vec::new()),
            FieldKind::Select { options } => ("select", options.clone()),
            FieldKind::RemoteSelect { endpoint } => ("select_uri", vec![endpoint.clone()]),
        }
    }

    /// Whether the user types the value rather than picking it.
    pub fn is_free_text(&self) -> bool {
        match self {
            FieldKind::Text
            | FieldKind::LongText
            | FieldKind::Email
            | FieldKind::Number
            | FieldKind::Date => true,
            FieldKind::Select { .. } | FieldKind::RemoteSelect { .. } => false,
        }
    }
}

/// One entry of an area's parameter store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireField", into = "WireField")]
pub struct FieldSchema {
    /// Lower sorts first.
    pub priority: i64,
    pub kind: FieldKind,
    pub description: String,
    pub required: bool,
    /// Fields that must be filled before this one is shown.
    pub need_fields: Vec<String>,
    /// Components the server accepts inside this field.
    pub allowed_components: Vec<String>,
}

impl FieldSchema {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            priority: 0,
            kind,
            description: String::new(),
            required: false,
            need_fields: Vec::new(),
            allowed_components: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn depends_on(mut self, fields: &[&str]) -> Self {
        self.need_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireField {
    #[serde(default)]
    priority: i64,
    #[serde(rename = "type", default)]
    type_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    required: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    need_fields: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    allowed_components: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    values: Vec<String>,
}

impl From<WireField> for FieldSchema {
    fn from(wire: WireField) -> Self {
        Self {
            priority: wire.priority,
            kind: FieldKind::from_wire(&wire.type_name, wire.values),
            description: wire.description,
            required: wire.required,
            need_fields: wire.need_fields,
            allowed_components: wire.allowed_components,
        }
    }
}

impl From<FieldSchema> for WireField {
    fn from(schema: FieldSchema) -> Self {
        let (type_name, values) = schema.kind.to_wire();
        Self {
            priority: schema.priority,
            type_name: type_name.to_string(),
            description: schema.description,
            required: schema.required,
            need_fields: schema.need_fields,
            allowed_components: schema.allowed_components,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_uri_takes_first_value_as_endpoint() {
        let schema: FieldSchema = serde_json::from_value(json!({
            "priority": 2,
            "type": "select_uri",
            "description": "Channel",
            "required": true,
            "need_fields": ["req:guild_id"],
            "allowed_components": null,
            "values": ["/guilds/${req:guild_id}/channels"]
        }))
        .unwrap();

        assert_eq!(
            schema.kind,
            FieldKind::RemoteSelect {
                endpoint: "/guilds/${req:guild_id}/channels".to_string()
            }
        );
        assert_eq!(schema.need_fields, vec!["req:guild_id"]);
        assert!(schema.allowed_components.is_empty());
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        let schema: FieldSchema =
            serde_json::from_value(json!({"type": "bool", "values": null})).unwrap();
        assert_eq!(schema.kind, FieldKind::Text);
        assert!(!schema.required);
    }

    #[test]
    fn test_select_keeps_options() {
        let schema: FieldSchema = serde_json::from_value(json!({
            "type": "select",
            "values": ["true", "false"]
        }))
        .unwrap();
        assert!(!schema.kind.is_free_text());
        assert_eq!(
            schema.kind,
            FieldKind::Select {
                options: vec!["true".into(), "false".into()]
            }
        );
    }

    #[test]
    fn test_serializes_back_to_wire_shape() {
        let schema = FieldSchema::new(FieldKind::LongText).required();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "long_string");
        assert_eq!(value["required"], true);
    }
}
