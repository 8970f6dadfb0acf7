//! # Remote Select Options
//!
//! Service proxy endpoints answer with `{data: [...], fields: [name_path,
//! value_path]}` where each path is a colon-separated walk into every item
//! of `data`.

use serde::{Deserialize, Serialize};

use crate::service::null_as_default;
use crate::settings::{component_matches_field, component_token};
use crate::text::pretty;

/// Prefix of synthetic options that reference a component.
pub const VARIABLE_PREFIX: &str = "[Variable]: ";

/// One entry of a select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// The same text as label and value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Payload of a service proxy call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceOptions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<String>,
}

impl ServiceOptions {
    /// Extract `(label, value)` pairs. Items missing either path are skipped.
    pub fn options(&self) -> Vec<SelectOption> {
        let (Some(name_path), Some(value_path)) = (self.fields.first(), self.fields.get(1)) else {
            return Vec::new();
        };

        self.data
            .iter()
            .filter_map(|item| {
                let label = walk(item, name_path)?;
                let value = walk(item, value_path)?;
                Some(SelectOption { label, value })
            })
            .collect()
    }
}

fn walk(item: &serde_json::Value, path: &str) -> Option<String> {
    let mut current = item;
    for segment in path.split(':') {
        current = match current {
            serde_json::Value::Object(map) => map.get(segment)?,
            serde_json::Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match current {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Synthetic options referencing components that can feed `field`.
pub fn variable_options(components: &[String], service: &str, field: &str) -> Vec<SelectOption> {
    components
        .iter()
        .filter(|component| component_matches_field(component, service, field))
        .map(|component| {
            SelectOption::new(
                format!("{VARIABLE_PREFIX}{}", pretty(component)),
                component_token(component),
            )
        })
        .collect()
}
